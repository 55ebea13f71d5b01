// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user preference profile as stored in the preferences document.

use crate::i18n::Language;
use crate::models::Topic;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two top-level content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movies,
    Series,
}

impl MediaKind {
    /// Key used in the document and in button payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movies => "movies",
            MediaKind::Series => "series",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MediaKind::Movies => "🎬",
            MediaKind::Series => "📺",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    /// Accepts the storage keys plus TMDB's singular media types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" | "movie" => Ok(MediaKind::Movies),
            "series" | "tv" => Ok(MediaKind::Series),
            other => Err(format!("Unknown media kind: {}", other)),
        }
    }
}

/// A saved reference to a movie or series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// TMDB item ID
    pub id: u64,
    /// Title snapshot taken when the entry was added
    pub title: String,
    /// TMDB poster path, if the item had one
    pub poster_path: Option<String>,
    /// When the entry was added (ISO 8601); empty if never recorded
    #[serde(default)]
    pub added_at: String,
}

impl FavoriteEntry {
    pub fn new(id: u64, title: impl Into<String>, poster_path: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path,
            added_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Favorites split by media kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub movies: Vec<FavoriteEntry>,
    #[serde(default)]
    pub series: Vec<FavoriteEntry>,
}

impl Favorites {
    pub fn list(&self, kind: MediaKind) -> &[FavoriteEntry] {
        match kind {
            MediaKind::Movies => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    fn list_mut(&mut self, kind: MediaKind) -> &mut Vec<FavoriteEntry> {
        match kind {
            MediaKind::Movies => &mut self.movies,
            MediaKind::Series => &mut self.series,
        }
    }

    pub fn contains(&self, kind: MediaKind, id: u64) -> bool {
        self.list(kind).iter().any(|f| f.id == id)
    }

    /// Append an entry unless its ID is already present for that kind.
    pub fn insert(&mut self, kind: MediaKind, entry: FavoriteEntry) -> bool {
        if self.contains(kind, entry.id) {
            return false;
        }
        self.list_mut(kind).push(entry);
        true
    }

    /// Remove the entry with `id`, preserving the order of the rest.
    pub fn remove(&mut self, kind: MediaKind, id: u64) -> bool {
        let list = self.list_mut(kind);
        match list.iter().position(|f| f.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Preferences for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub favorites: Favorites,
    /// Subscribed topics in the order they were added
    #[serde(default, deserialize_with = "deserialize_topics")]
    pub subscriptions: Vec<Topic>,
}

impl UserProfile {
    pub fn is_subscribed(&self, topic: Topic) -> bool {
        self.subscriptions.contains(&topic)
    }

    pub fn subscribe(&mut self, topic: Topic) -> bool {
        if self.is_subscribed(topic) {
            return false;
        }
        self.subscriptions.push(topic);
        true
    }

    pub fn unsubscribe(&mut self, topic: Topic) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|t| *t != topic);
        self.subscriptions.len() != before
    }
}

/// Drop unknown or repeated topic keys instead of rejecting the document.
fn deserialize_topics<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Topic>, D::Error> {
    let keys = Vec::<String>::deserialize(deserializer)?;
    let mut topics = Vec::with_capacity(keys.len());

    for key in keys {
        match key.parse::<Topic>() {
            Ok(topic) if !topics.contains(&topic) => topics.push(topic),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Dropping stored subscription"),
        }
    }
    Ok(topics)
}
