// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod media;
pub mod profile;
pub mod topic;

pub use media::{Genre, MediaItem, MediaType, MovieDetails, Page, SeriesDetails, Video, VideoList};
pub use profile::{FavoriteEntry, Favorites, MediaKind, UserProfile};
pub use topic::{Topic, UnknownTopic};

/// Chat-network user identifier.
pub type UserId = i64;
