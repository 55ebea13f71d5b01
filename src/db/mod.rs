// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (JSON preference document).

pub mod prefs;

pub use prefs::{PrefsStore, StoreError};
