// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file preference store.
//!
//! The whole document is one JSON object keyed by stringified user ID.
//! Every operation runs load → mutate → save under a single async mutex,
//! so overlapping callers can never clobber each other's updates. Saves go
//! to a sibling temp file which is then renamed over the document.
//!
//! Each profile is parsed on its own. An entry that does not parse is kept
//! verbatim and written back unchanged until its user is next active, at
//! which point it is moved to a quarantine file and replaced by a fresh
//! profile.

use crate::i18n::{Language, BASELINE};
use crate::models::{FavoriteEntry, MediaKind, Topic, UserId, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// The persisted document, keyed by stringified user ID.
#[derive(Debug, Default)]
struct Document {
    profiles: BTreeMap<String, UserProfile>,
    /// Entries that are not valid profiles, written back verbatim.
    unreadable: BTreeMap<String, Value>,
}

/// One entry of the document as written to disk.
#[derive(Serialize)]
#[serde(untagged)]
enum StoredEntry<'a> {
    Profile(&'a UserProfile),
    Raw(&'a Value),
}

impl Document {
    /// Parse the top-level object, then each profile separately.
    fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let entries: BTreeMap<String, Value> = serde_json::from_slice(bytes)?;
        let mut doc = Document::default();
        for (key, value) in entries {
            match UserProfile::deserialize(&value) {
                Ok(profile) => {
                    doc.profiles.insert(key, profile);
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "Keeping unreadable profile verbatim");
                    doc.unreadable.insert(key, value);
                }
            }
        }
        Ok(doc)
    }

    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let entries: BTreeMap<&str, StoredEntry<'_>> = self
            .profiles
            .iter()
            .map(|(k, p)| (k.as_str(), StoredEntry::Profile(p)))
            .chain(self.unreadable.iter().map(|(k, v)| (k.as_str(), StoredEntry::Raw(v))))
            .collect();
        let mut bytes = serde_json::to_vec_pretty(&entries)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn len(&self) -> usize {
        self.profiles.len() + self.unreadable.len()
    }
}

/// Errors from the preference store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Durable mapping from user ID to [`UserProfile`].
///
/// Cheap to clone; all clones share the same lock.
#[derive(Clone)]
pub struct PrefsStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    /// Held across load + save; the single-writer guard for the file.
    lock: Mutex<()>,
}

impl PrefsStore {
    /// Create a store backed by `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Create a store and load the document once, so a corrupt file is
    /// reported (and quarantined) at startup rather than on first use.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        let doc = {
            let _guard = store.inner.lock.lock().await;
            store.load().await?
        };
        tracing::info!(
            path = %store.inner.path.display(),
            profiles = doc.len(),
            "Preference store opened"
        );
        if !doc.unreadable.is_empty() {
            tracing::warn!(
                keys = ?doc.unreadable.keys().collect::<Vec<_>>(),
                "Preference file has unreadable profiles, keeping them as-is"
            );
        }
        Ok(store)
    }

    // ─── Language ────────────────────────────────────────────────

    /// Stored language, or the baseline. Never fails; faults are logged.
    pub async fn get_language(&self, user_id: UserId) -> Language {
        match self.with_profile(user_id, |p| (p.language, false)).await {
            Ok(lang) => lang,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to read language, using baseline");
                BASELINE
            }
        }
    }

    pub async fn set_language(&self, user_id: UserId, language: Language) -> Result<(), StoreError> {
        self.with_profile(user_id, |p| {
            let changed = p.language != language;
            p.language = language;
            ((), changed)
        })
        .await?;
        tracing::info!(user_id, language = language.code(), "Language updated");
        Ok(())
    }

    // ─── Favorites ───────────────────────────────────────────────

    pub async fn list_favorites(
        &self,
        user_id: UserId,
        kind: MediaKind,
    ) -> Result<Vec<FavoriteEntry>, StoreError> {
        self.with_profile(user_id, |p| (p.favorites.list(kind).to_vec(), false))
            .await
    }

    /// Add a favorite. Returns `false` if the item is already saved.
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        kind: MediaKind,
        item_id: u64,
        title: &str,
        poster_path: Option<String>,
    ) -> Result<bool, StoreError> {
        let entry = FavoriteEntry::new(item_id, title, poster_path);
        let added = self
            .with_profile(user_id, |p| {
                let added = p.favorites.insert(kind, entry);
                (added, added)
            })
            .await?;

        tracing::debug!(user_id, %kind, item_id, added, "Add favorite");
        Ok(added)
    }

    /// Remove a favorite. Returns `false` if it was not saved.
    ///
    /// An unknown user is not materialized by a removal.
    pub async fn remove_favorite(
        &self,
        user_id: UserId,
        kind: MediaKind,
        item_id: u64,
    ) -> Result<bool, StoreError> {
        let removed = self
            .with_existing_profile(user_id, false, |p| {
                let removed = p.favorites.remove(kind, item_id);
                (removed, removed)
            })
            .await?;

        tracing::debug!(user_id, %kind, item_id, removed, "Remove favorite");
        Ok(removed)
    }

    pub async fn is_favorite(
        &self,
        user_id: UserId,
        kind: MediaKind,
        item_id: u64,
    ) -> Result<bool, StoreError> {
        self.with_profile(user_id, |p| (p.favorites.contains(kind, item_id), false))
            .await
    }

    // ─── Subscriptions ───────────────────────────────────────────

    pub async fn list_subscriptions(&self, user_id: UserId) -> Result<Vec<Topic>, StoreError> {
        self.with_profile(user_id, |p| (p.subscriptions.clone(), false))
            .await
    }

    /// Subscribe to a catalog topic. Returns `false` for unknown topics and
    /// existing subscriptions.
    pub async fn add_subscription(&self, user_id: UserId, topic: &str) -> Result<bool, StoreError> {
        let Ok(topic) = topic.parse::<Topic>() else {
            tracing::debug!(user_id, topic, "Rejected unknown topic");
            return Ok(false);
        };

        self.with_profile(user_id, |p| {
            let added = p.subscribe(topic);
            (added, added)
        })
        .await
    }

    /// Unsubscribe. Returns `false` if the user was not subscribed.
    pub async fn remove_subscription(
        &self,
        user_id: UserId,
        topic: &str,
    ) -> Result<bool, StoreError> {
        let Ok(topic) = topic.parse::<Topic>() else {
            return Ok(false);
        };

        self.with_existing_profile(user_id, false, |p| {
            let removed = p.unsubscribe(topic);
            (removed, removed)
        })
        .await
    }

    /// Flip a subscription in one step. Returns the new state, or `None`
    /// for unknown topics.
    pub async fn toggle_subscription(
        &self,
        user_id: UserId,
        topic: &str,
    ) -> Result<Option<bool>, StoreError> {
        let Ok(topic) = topic.parse::<Topic>() else {
            tracing::debug!(user_id, topic, "Rejected unknown topic");
            return Ok(None);
        };

        self.with_profile(user_id, |p| {
            let subscribed = if p.is_subscribed(topic) {
                p.unsubscribe(topic);
                false
            } else {
                p.subscribe(topic);
                true
            };
            (Some(subscribed), true)
        })
        .await
    }

    pub async fn is_subscribed(&self, user_id: UserId, topic: &str) -> Result<bool, StoreError> {
        let Ok(topic) = topic.parse::<Topic>() else {
            return Ok(false);
        };
        self.with_profile(user_id, |p| (p.is_subscribed(topic), false))
            .await
    }

    /// All users subscribed to `topic`, ascending. Non-numeric keys are skipped.
    pub async fn subscribers_of(&self, topic: Topic) -> Result<Vec<UserId>, StoreError> {
        let doc = {
            let _guard = self.inner.lock.lock().await;
            self.load().await?
        };

        let mut subscribers: Vec<UserId> = doc
            .profiles
            .iter()
            .filter(|(_, profile)| profile.is_subscribed(topic))
            .filter_map(|(key, _)| match key.parse::<UserId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(key = %key, "Skipping non-numeric user key");
                    None
                }
            })
            .collect();
        subscribers.sort_unstable();
        Ok(subscribers)
    }

    /// Snapshot of the user's whole profile.
    pub async fn profile(&self, user_id: UserId) -> Result<UserProfile, StoreError> {
        self.with_profile(user_id, |p| (p.clone(), false)).await
    }

    // ─── Document I/O ────────────────────────────────────────────

    /// Run `f` against the user's profile, creating it if needed.
    ///
    /// `f` returns its result plus whether it changed the profile; the
    /// document is saved if the profile was created or changed.
    async fn with_profile<R>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut UserProfile) -> (R, bool),
    ) -> Result<R, StoreError> {
        let _guard = self.inner.lock.lock().await;
        let mut doc = self.load().await?;

        let key = user_id.to_string();
        if let Some(raw) = doc.unreadable.remove(&key) {
            self.quarantine_entry(&key, &raw).await?;
        }
        let created = !doc.profiles.contains_key(&key);
        let profile = doc.profiles.entry(key).or_default();
        let (result, changed) = f(profile);

        if created {
            tracing::info!(user_id, "Created profile");
        }
        if created || changed {
            self.save(&doc).await?;
        }
        Ok(result)
    }

    /// Like [`with_profile`](Self::with_profile), but returns `missing`
    /// without saving when the user has no profile.
    async fn with_existing_profile<R>(
        &self,
        user_id: UserId,
        missing: R,
        f: impl FnOnce(&mut UserProfile) -> (R, bool),
    ) -> Result<R, StoreError> {
        let _guard = self.inner.lock.lock().await;
        let mut doc = self.load().await?;

        let Some(profile) = doc.profiles.get_mut(&user_id.to_string()) else {
            return Ok(missing);
        };
        let (result, changed) = f(profile);

        if changed {
            self.save(&doc).await?;
        }
        Ok(result)
    }

    /// Read the document. Caller must hold the lock.
    ///
    /// A missing or blank file is an empty document. An unparsable file is
    /// moved aside and treated as empty.
    async fn load(&self) -> Result<Document, StoreError> {
        let path = &self.inner.path;

        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }

        match Document::parse(&bytes) {
            Ok(doc) => Ok(doc),
            Err(parse_err) => {
                let quarantine = quarantine_path(path).await?;
                fs::rename(path, &quarantine)
                    .await
                    .map_err(|e| StoreError::io(path, e))?;
                tracing::error!(
                    path = %path.display(),
                    moved_to = %quarantine.display(),
                    error = %parse_err,
                    "Preference file is corrupt, starting from an empty document"
                );
                Ok(Document::default())
            }
        }
    }

    /// Atomically replace the document. Caller must hold the lock.
    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let path = &self.inner.path;
        let tmp = sibling(path, "tmp");
        let bytes = doc.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io(path, e))?;

        tracing::debug!(path = %path.display(), profiles = doc.len(), "Preferences saved");
        Ok(())
    }

    /// Move one unreadable entry out to its own quarantine file.
    async fn quarantine_entry(&self, key: &str, raw: &Value) -> Result<(), StoreError> {
        let path = &self.inner.path;
        let quarantine = quarantine_path(path).await?;
        let mut bytes = serde_json::to_vec_pretty(&BTreeMap::from([(key, raw)]))?;
        bytes.push(b'\n');
        fs::write(&quarantine, bytes)
            .await
            .map_err(|e| StoreError::io(&quarantine, e))?;
        tracing::error!(
            key,
            moved_to = %quarantine.display(),
            "Replacing unreadable profile with a fresh one"
        );
        Ok(())
    }
}

/// A free `<file>.corrupt-<unix millis>[-n]` path next to `path`.
async fn quarantine_path(path: &Path) -> Result<PathBuf, StoreError> {
    let stamp = chrono::Utc::now().timestamp_millis();
    let mut candidate = sibling(path, &format!("corrupt-{}", stamp));
    let mut n = 1u32;
    while fs::try_exists(&candidate)
        .await
        .map_err(|e| StoreError::io(&candidate, e))?
    {
        candidate = sibling(path, &format!("corrupt-{}-{}", stamp, n));
        n += 1;
    }
    Ok(candidate)
}

/// `user_prefs.json` + `tmp` → `user_prefs.json.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
