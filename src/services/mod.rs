// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external API clients.

pub mod tmdb;

pub use tmdb::TmdbClient;
