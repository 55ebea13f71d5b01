// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Subscription topic catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A subscription topic. The catalog is closed; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    NewMovies,
    NewSeries,
    Trending,
    Action,
    Comedy,
    Drama,
    Horror,
    Scifi,
    Romance,
    Animation,
}

impl Topic {
    /// Catalog in display order.
    pub const ALL: [Topic; 10] = [
        Topic::NewMovies,
        Topic::NewSeries,
        Topic::Trending,
        Topic::Action,
        Topic::Comedy,
        Topic::Drama,
        Topic::Horror,
        Topic::Scifi,
        Topic::Romance,
        Topic::Animation,
    ];

    /// Stored key (e.g. "new_movies").
    pub fn key(self) -> &'static str {
        match self {
            Topic::NewMovies => "new_movies",
            Topic::NewSeries => "new_series",
            Topic::Trending => "trending",
            Topic::Action => "action",
            Topic::Comedy => "comedy",
            Topic::Drama => "drama",
            Topic::Horror => "horror",
            Topic::Scifi => "scifi",
            Topic::Romance => "romance",
            Topic::Animation => "animation",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Topic::NewMovies => "🎬",
            Topic::NewSeries => "📺",
            Topic::Trending => "🔥",
            Topic::Action => "💥",
            Topic::Comedy => "😂",
            Topic::Drama => "🎭",
            Topic::Horror => "👻",
            Topic::Scifi => "🚀",
            Topic::Romance => "💕",
            Topic::Animation => "🎨",
        }
    }

    /// Translation key for the topic's display name.
    pub fn name_key(self) -> &'static str {
        match self {
            Topic::NewMovies => "sub_new_movies",
            Topic::NewSeries => "sub_new_series",
            Topic::Trending => "sub_trending",
            Topic::Action => "sub_action",
            Topic::Comedy => "sub_comedy",
            Topic::Drama => "sub_drama",
            Topic::Horror => "sub_horror",
            Topic::Scifi => "sub_scifi",
            Topic::Romance => "sub_romance",
            Topic::Animation => "sub_animation",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a key is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subscription topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}
