// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Update dispatch: commands, button presses and inline queries.
//!
//! Upstream API failures degrade to the localized empty state. Store
//! faults are logged and answered with an empty response.

use super::action::{Callback, Command, Listing};
use super::format::{
    escape_html, format_item, format_movie_details, format_series_details, page_total,
    truncate_chars, year,
};
use super::keyboard;
use super::response::{BotResponse, DeliveryMode, InlineAnswer, InlineArticle, OutgoingMessage};
use crate::db::PrefsStore;
use crate::error::AppError;
use crate::i18n::{fill, Language};
use crate::models::{FavoriteEntry, MediaItem, MediaKind, MediaType, Page, UserId, VideoList};
use crate::services::tmdb::{TimeWindow, TmdbClient, TrendingMedia};
use sha2::{Digest, Sha256};

const INLINE_RESULT_LIMIT: usize = 10;
const INLINE_OVERVIEW_CHARS: usize = 100;
const FALLBACK_TMDB_LANGUAGE: &str = "en-US";

/// Renders bot screens from user preferences and TMDB data.
#[derive(Clone)]
pub struct BotService {
    prefs: PrefsStore,
    tmdb: TmdbClient,
}

impl BotService {
    pub fn new(prefs: PrefsStore, tmdb: TmdbClient) -> Self {
        Self { prefs, tmdb }
    }

    /// Handle a text message. Non-commands get an empty response.
    pub async fn handle_command(&self, user_id: UserId, text: &str) -> BotResponse {
        let Some(command) = Command::parse(text) else {
            tracing::debug!(user_id, "Ignoring non-command message");
            return BotResponse::empty();
        };

        tracing::debug!(user_id, ?command, "Command");
        let lang = self.prefs.get_language(user_id).await;
        let mode = DeliveryMode::Send;

        let result = match command {
            Command::Start | Command::Help => Ok(welcome(lang, mode)),
            Command::Movies => Ok(self.show_listing(lang, Listing::NowPlaying, 1, mode).await),
            Command::Series => Ok(self.show_listing(lang, Listing::AiringToday, 1, mode).await),
            Command::Trending => Ok(self.show_listing(lang, Listing::Trending, 1, mode).await),
            Command::Search(Some(query)) => Ok(self.show_search(lang, &query, 1, mode).await),
            Command::Search(None) => Ok(BotResponse::message(
                OutgoingMessage::new(lang.text("how_to_search"), mode)
                    .with_keyboard(keyboard::back_to_menu(lang)),
            )),
            Command::Language => Ok(language_menu(lang, mode)),
            Command::Favorites => Ok(favorites_menu(lang, mode)),
            Command::Subscriptions => self.subscriptions_menu(user_id, lang, mode).await,
        };

        absorb(user_id, result)
    }

    /// Handle a button press. Malformed payloads get an empty response.
    pub async fn handle_callback(&self, user_id: UserId, data: &str) -> BotResponse {
        let Some(callback) = Callback::parse(data) else {
            tracing::debug!(user_id, data, "Ignoring malformed button payload");
            return BotResponse::empty();
        };

        tracing::debug!(user_id, ?callback, "Button");
        if callback == Callback::Noop {
            return BotResponse::empty();
        }

        let lang = self.prefs.get_language(user_id).await;
        let mode = DeliveryMode::Replace;

        let result = match callback {
            Callback::Noop => Ok(BotResponse::empty()),
            Callback::MainMenu => Ok(welcome(lang, mode)),
            Callback::Browse(listing, page) => Ok(self.show_listing(lang, listing, page, mode).await),
            Callback::Search { query, page } => Ok(self.show_search(lang, &query, page, mode).await),
            Callback::Details(kind, id) => Ok(self.show_details(lang, kind, id).await),
            Callback::Trailer(kind, id) => Ok(self.show_trailer(lang, kind, id).await),
            Callback::LanguageMenu => Ok(language_menu(lang, mode)),
            Callback::SetLanguage(new_lang) => self.set_language(user_id, new_lang).await,
            Callback::FavoritesMenu => Ok(favorites_menu(lang, mode)),
            Callback::FavoritesList(kind) => self.favorites_list(user_id, lang, kind, 0).await,
            Callback::FavoritesPage(kind, page) => {
                self.favorites_list(user_id, lang, kind, page).await
            }
            Callback::FavoriteAdd(kind, id) => self.add_favorite(user_id, lang, kind, id).await,
            Callback::FavoriteRemove(kind, id) => {
                self.remove_favorite(user_id, lang, kind, id).await
            }
            Callback::FavoriteView(kind, id) => Ok(self.view_favorite(lang, kind, id).await),
            Callback::SubscriptionsMenu => self.subscriptions_menu(user_id, lang, mode).await,
            Callback::SubscriptionToggle(topic) => {
                self.toggle_subscription(user_id, lang, &topic).await
            }
            Callback::MySubscriptions => self.my_subscriptions(user_id, lang).await,
            Callback::Unsubscribe(topic) => self.unsubscribe(user_id, lang, &topic).await,
        };

        absorb(user_id, result)
    }

    /// Answer an inline-mode search.
    pub async fn handle_inline_query(&self, user_id: UserId, query: &str) -> InlineAnswer {
        let query = query.trim();
        let lang = self.prefs.get_language(user_id).await;

        if query.is_empty() {
            return InlineAnswer {
                results: vec![InlineArticle {
                    id: "hint".to_string(),
                    title: lang.text("inline_hint_title").to_string(),
                    description: lang.text("inline_hint_description").to_string(),
                    thumbnail_url: None,
                    message_text: lang.text("inline_hint_message").to_string(),
                    html: false,
                }],
                cache_time: 1,
            };
        }

        let page = self
            .tmdb
            .search_multi(query, 1, lang.tmdb_code())
            .await
            .unwrap_or_else(upstream_empty);

        let mut results: Vec<InlineArticle> = page
            .results
            .iter()
            .take(INLINE_RESULT_LIMIT)
            .filter_map(|item| self.inline_article(item, lang))
            .collect();

        if results.is_empty() {
            let args = [("query", query)];
            results.push(InlineArticle {
                id: "no_results".to_string(),
                title: lang.text("inline_no_results_title").to_string(),
                description: fill(lang.text("inline_no_results_description"), &args),
                thumbnail_url: None,
                message_text: fill(lang.text("inline_no_results_message"), &args),
                html: false,
            });
        }

        tracing::debug!(user_id, results = results.len(), "Inline query answered");
        InlineAnswer {
            results,
            cache_time: 60,
        }
    }

    // ─── Listings ────────────────────────────────────────────────

    async fn fetch_listing(&self, listing: Listing, page: u32, lang: &str) -> Result<Page<MediaItem>, AppError> {
        match listing {
            Listing::NowPlaying => self.tmdb.now_playing_movies(page, lang).await,
            Listing::PopularMovies => self.tmdb.popular_movies(page, lang).await,
            Listing::AiringToday => self.tmdb.airing_today_series(page, lang).await,
            Listing::PopularSeries => self.tmdb.popular_series(page, lang).await,
            Listing::Trending => {
                self.tmdb
                    .trending(TrendingMedia::All, TimeWindow::Week, page, lang)
                    .await
            }
        }
    }

    async fn show_listing(&self, lang: Language, listing: Listing, page: u32, mode: DeliveryMode) -> BotResponse {
        let page = page.max(1);
        let data = self
            .fetch_listing(listing, page, lang.tmdb_code())
            .await
            .unwrap_or_else(upstream_empty);

        let first = data.results.iter().find_map(|item| match listing.kind() {
            Some(kind) => Some((kind, item)),
            None => item_kind(item).map(|kind| (kind, item)),
        });

        let (header, empty_key) = match listing {
            Listing::NowPlaying => ("now_playing", "no_movies"),
            Listing::PopularMovies => ("popular_movies_title", "no_movies"),
            Listing::AiringToday => ("airing_today", "no_series"),
            Listing::PopularSeries => ("popular_series_title", "no_series"),
            Listing::Trending => ("trending_week", "no_results"),
        };

        let Some((kind, item)) = first else {
            return BotResponse::message(
                OutgoingMessage::new(lang.text(empty_key), mode)
                    .with_keyboard(keyboard::back_to_menu(lang)),
            );
        };

        let text = format!("{}\n\n{}", lang.text(header), format_item(item, lang));
        let total = page_total(data.total_pages);
        BotResponse::message(
            OutgoingMessage::new(text, mode)
                .with_photo(self.tmdb.poster_url(item.poster_path.as_deref()))
                .with_keyboard(keyboard::listing(lang, listing, page, total, Some((kind, item.id)))),
        )
    }

    async fn show_search(&self, lang: Language, query: &str, page: u32, mode: DeliveryMode) -> BotResponse {
        let page = page.max(1);
        let data = self
            .tmdb
            .search_multi(query, page, lang.tmdb_code())
            .await
            .unwrap_or_else(upstream_empty);

        let header = format!("{} {}", lang.text("search_title"), escape_html(query));
        let first = data
            .results
            .iter()
            .find_map(|item| item_kind(item).map(|kind| (kind, item)));

        let Some((kind, item)) = first else {
            return BotResponse::message(
                OutgoingMessage::new(format!("{}\n\n{}", header, lang.text("no_results")), mode)
                    .with_keyboard(keyboard::back_to_menu(lang)),
            );
        };

        let text = format!("{}\n\n{} {}", header, kind.emoji(), format_item(item, lang));
        let total = page_total(data.total_pages);
        BotResponse::message(
            OutgoingMessage::new(text, mode).with_keyboard(keyboard::search_results(
                lang,
                query,
                page,
                total,
                Some((kind, item.id)),
            )),
        )
    }

    // ─── Details & trailers ──────────────────────────────────────

    /// Details text, or `None` if TMDB has nothing usable.
    async fn details_text(&self, lang: Language, kind: MediaKind, id: u64) -> Option<String> {
        let tmdb_lang = lang.tmdb_code();
        let result = match kind {
            MediaKind::Movies => self
                .tmdb
                .movie_details(id, tmdb_lang)
                .await
                .map(|m| m.title.is_some().then(|| format_movie_details(&m, lang))),
            MediaKind::Series => self
                .tmdb
                .series_details(id, tmdb_lang)
                .await
                .map(|s| s.name.is_some().then(|| format_series_details(&s, lang))),
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%kind, id, error = %e, "Details lookup failed");
                None
            }
        }
    }

    async fn show_details(&self, lang: Language, kind: MediaKind, id: u64) -> BotResponse {
        let message = match self.details_text(lang, kind, id).await {
            Some(text) => OutgoingMessage::new(text, DeliveryMode::Replace)
                .with_keyboard(keyboard::details(lang, kind, id)),
            None => OutgoingMessage::new(lang.text(empty_key(kind)), DeliveryMode::Replace)
                .with_keyboard(keyboard::back_to_menu(lang)),
        };
        BotResponse::message(message)
    }

    async fn videos(&self, kind: MediaKind, id: u64, tmdb_lang: &str) -> VideoList {
        let result = match kind {
            MediaKind::Movies => self.tmdb.movie_videos(id, tmdb_lang).await,
            MediaKind::Series => self.tmdb.series_videos(id, tmdb_lang).await,
        };
        result.unwrap_or_else(|e| {
            tracing::warn!(%kind, id, error = %e, "Video lookup failed");
            VideoList::default()
        })
    }

    /// First YouTube trailer in the user's language, then in English.
    async fn find_trailer(&self, lang: Language, kind: MediaKind, id: u64) -> Option<String> {
        let kinds: &[&str] = match kind {
            MediaKind::Movies => &["Trailer"],
            MediaKind::Series => &["Trailer", "Teaser"],
        };

        let videos = self.videos(kind, id, lang.tmdb_code()).await;
        if let Some(video) = videos.first_youtube(kinds) {
            return Some(video.youtube_url());
        }
        if lang.tmdb_code() == FALLBACK_TMDB_LANGUAGE {
            return None;
        }

        let videos = self.videos(kind, id, FALLBACK_TMDB_LANGUAGE).await;
        videos.first_youtube(kinds).map(|v| v.youtube_url())
    }

    async fn show_trailer(&self, lang: Language, kind: MediaKind, id: u64) -> BotResponse {
        match self.find_trailer(lang, kind, id).await {
            Some(url) => BotResponse::notice(lang.text("opening_trailer"), false).with_message(
                OutgoingMessage::new(
                    format!("🎬 <b>{}</b>\n\n{}", lang.text("trailer_title"), url),
                    DeliveryMode::Send,
                ),
            ),
            None => BotResponse::notice(lang.text("no_trailer"), true),
        }
    }

    // ─── Language ────────────────────────────────────────────────

    async fn set_language(&self, user_id: UserId, new_lang: Language) -> Result<BotResponse, AppError> {
        self.prefs.set_language(user_id, new_lang).await?;
        Ok(BotResponse::notice(format!("✅ {}", new_lang.display_name()), true)
            .with_message(welcome_message(new_lang, DeliveryMode::Replace)))
    }

    // ─── Favorites ───────────────────────────────────────────────

    async fn favorites_list(
        &self,
        user_id: UserId,
        lang: Language,
        kind: MediaKind,
        page: usize,
    ) -> Result<BotResponse, AppError> {
        let favorites = self.prefs.list_favorites(user_id, kind).await?;
        Ok(BotResponse::message(render_favorites(lang, kind, &favorites, page)))
    }

    async fn add_favorite(
        &self,
        user_id: UserId,
        lang: Language,
        kind: MediaKind,
        id: u64,
    ) -> Result<BotResponse, AppError> {
        let tmdb_lang = lang.tmdb_code();
        let snapshot = match kind {
            MediaKind::Movies => self
                .tmdb
                .movie_details(id, tmdb_lang)
                .await
                .map(|m| (m.title, m.poster_path)),
            MediaKind::Series => self
                .tmdb
                .series_details(id, tmdb_lang)
                .await
                .map(|s| (s.name, s.poster_path)),
        };

        let (title, poster_path) = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(user_id, %kind, id, error = %e, "Cannot add favorite without details");
                return Ok(BotResponse::notice(format!("❌ {}", lang.text("error")), true));
            }
        };
        let title = title.unwrap_or_else(|| lang.text("unknown_title").to_string());

        let notice = if self.prefs.add_favorite(user_id, kind, id, &title, poster_path).await? {
            format!("⭐ {}", lang.text("fav_added"))
        } else {
            format!("ℹ️ {}", lang.text("fav_already"))
        };
        Ok(BotResponse::notice(notice, true))
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        lang: Language,
        kind: MediaKind,
        id: u64,
    ) -> Result<BotResponse, AppError> {
        if !self.prefs.remove_favorite(user_id, kind, id).await? {
            return Ok(BotResponse::notice(format!("❌ {}", lang.text("fav_missing")), true));
        }

        let favorites = self.prefs.list_favorites(user_id, kind).await?;
        Ok(BotResponse::notice(format!("🗑️ {}", lang.text("fav_removed")), true)
            .with_message(render_favorites(lang, kind, &favorites, 0)))
    }

    async fn view_favorite(&self, lang: Language, kind: MediaKind, id: u64) -> BotResponse {
        let text = match self.details_text(lang, kind, id).await {
            Some(text) => text,
            None => lang.text(empty_key(kind)).to_string(),
        };
        BotResponse::message(
            OutgoingMessage::new(text, DeliveryMode::Replace)
                .with_keyboard(keyboard::favorite_view(lang, kind, id)),
        )
    }

    // ─── Subscriptions ───────────────────────────────────────────

    async fn subscriptions_menu(
        &self,
        user_id: UserId,
        lang: Language,
        mode: DeliveryMode,
    ) -> Result<BotResponse, AppError> {
        let subscribed = self.prefs.list_subscriptions(user_id).await?;
        let text = format!(
            "🔔 <b>{}</b>\n\n{}\n\n📊 {}: {}",
            lang.text("subscriptions"),
            lang.text("sub_description"),
            lang.text("sub_active"),
            subscribed.len()
        );
        Ok(BotResponse::message(
            OutgoingMessage::new(text, mode).with_keyboard(keyboard::subscriptions(lang, &subscribed)),
        ))
    }

    async fn toggle_subscription(
        &self,
        user_id: UserId,
        lang: Language,
        topic: &str,
    ) -> Result<BotResponse, AppError> {
        let notice = match self.prefs.toggle_subscription(user_id, topic).await? {
            Some(true) => format!("🔔 {}", lang.text("subscribed")),
            Some(false) => format!("🔕 {}", lang.text("unsubscribed")),
            None => return Ok(BotResponse::empty()),
        };

        Ok(self
            .subscriptions_menu(user_id, lang, DeliveryMode::Replace)
            .await?
            .with_notice(notice, false))
    }

    async fn my_subscriptions(&self, user_id: UserId, lang: Language) -> Result<BotResponse, AppError> {
        let subscribed = self.prefs.list_subscriptions(user_id).await?;
        let body = if subscribed.is_empty() {
            lang.text("sub_empty")
        } else {
            lang.text("sub_manage")
        };
        let text = format!("📋 <b>{}</b>\n\n{}", lang.text("my_subscriptions"), body);
        Ok(BotResponse::message(
            OutgoingMessage::new(text, DeliveryMode::Replace)
                .with_keyboard(keyboard::my_subscriptions(lang, &subscribed)),
        ))
    }

    async fn unsubscribe(&self, user_id: UserId, lang: Language, topic: &str) -> Result<BotResponse, AppError> {
        self.prefs.remove_subscription(user_id, topic).await?;
        Ok(self
            .my_subscriptions(user_id, lang)
            .await?
            .with_notice(format!("🔕 {}", lang.text("unsubscribed")), false))
    }

    // ─── Inline ──────────────────────────────────────────────────

    fn inline_article(&self, item: &MediaItem, lang: Language) -> Option<InlineArticle> {
        let kind = item_kind(item)?;
        let media = item.media_type.map(MediaType::as_str).unwrap_or("movie");
        let title = item.display_title().unwrap_or_else(|| lang.text("unknown_title"));
        let overview = item
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| lang.text("no_overview"));

        Some(InlineArticle {
            id: inline_result_id(media, item.id),
            title: format!("{} {} ({})", kind.emoji(), title, year(item.date())),
            description: format!(
                "⭐ {:.1} | {}...",
                item.vote_average,
                truncate_chars(overview, INLINE_OVERVIEW_CHARS)
            ),
            thumbnail_url: self.tmdb.poster_url(item.poster_path.as_deref()),
            message_text: format_item(item, lang),
            html: true,
        })
    }
}

// ─── Screens without I/O ─────────────────────────────────────────

fn welcome_message(lang: Language, mode: DeliveryMode) -> OutgoingMessage {
    OutgoingMessage::new(lang.text("welcome"), mode).with_keyboard(keyboard::main_menu(lang))
}

fn welcome(lang: Language, mode: DeliveryMode) -> BotResponse {
    BotResponse::message(welcome_message(lang, mode))
}

fn language_menu(lang: Language, mode: DeliveryMode) -> BotResponse {
    BotResponse::message(
        OutgoingMessage::new(lang.text("select_language"), mode)
            .with_keyboard(keyboard::language_picker()),
    )
}

fn favorites_menu(lang: Language, mode: DeliveryMode) -> BotResponse {
    let text = format!("⭐ <b>{}</b>\n\n{}", lang.text("favorites"), lang.text("fav_description"));
    BotResponse::message(OutgoingMessage::new(text, mode).with_keyboard(keyboard::favorites_menu(lang)))
}

fn render_favorites(
    lang: Language,
    kind: MediaKind,
    favorites: &[FavoriteEntry],
    page: usize,
) -> OutgoingMessage {
    let heading_key = match kind {
        MediaKind::Movies => "fav_movies",
        MediaKind::Series => "fav_series",
    };
    let heading = format!("{} <b>{}</b>", kind.emoji(), lang.text(heading_key));

    if favorites.is_empty() {
        return OutgoingMessage::new(format!("{}\n\n{}", heading, lang.text("fav_empty")), DeliveryMode::Replace)
            .with_keyboard(keyboard::favorites_empty(lang));
    }

    let count = favorites.len().to_string();
    let text = format!("{}\n\n{}", heading, fill(lang.text("fav_count"), &[("count", &count)]));
    let page = page.min(keyboard::favorites_page_count(favorites.len()) - 1);
    OutgoingMessage::new(text, DeliveryMode::Replace)
        .with_keyboard(keyboard::favorites_list(lang, kind, favorites, page))
}

fn empty_key(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movies => "no_movies",
        MediaKind::Series => "no_series",
    }
}

/// Media kind of a mixed-endpoint entry; `None` for people and others.
fn item_kind(item: &MediaItem) -> Option<MediaKind> {
    match item.media_type? {
        MediaType::Movie => Some(MediaKind::Movies),
        MediaType::Tv => Some(MediaKind::Series),
        MediaType::Person | MediaType::Other => None,
    }
}

/// Stable inline result ID: hex SHA-256 of `<media>_<id>`, first 32 chars.
pub fn inline_result_id(media: &str, id: u64) -> String {
    let digest = Sha256::digest(format!("{}_{}", media, id).as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(32);
    hex
}

/// Substitute an empty page for a failed lookup.
fn upstream_empty(err: AppError) -> Page<MediaItem> {
    tracing::warn!(error = %err, "TMDB lookup failed, showing empty state");
    Page::default()
}

/// Turn handler faults into an empty response.
fn absorb(user_id: UserId, result: Result<BotResponse, AppError>) -> BotResponse {
    result.unwrap_or_else(|e| {
        tracing::error!(user_id, error = %e, "Update handling failed");
        BotResponse::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_result_id_is_stable() {
        let id = inline_result_id("movie", 603);
        assert_eq!(id.len(), 32);
        assert_eq!(id, inline_result_id("movie", 603));
        assert_ne!(id, inline_result_id("tv", 603));
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_item_kind() {
        let mut item = MediaItem {
            id: 1,
            ..Default::default()
        };
        assert_eq!(item_kind(&item), None);
        item.media_type = Some(MediaType::Tv);
        assert_eq!(item_kind(&item), Some(MediaKind::Series));
        item.media_type = Some(MediaType::Person);
        assert_eq!(item_kind(&item), None);
    }

    #[test]
    fn test_render_favorites_clamps_page() {
        let favorites: Vec<_> = (1..=6)
            .map(|id| FavoriteEntry::new(id, "x", None))
            .collect();
        let message = render_favorites(Language::English, MediaKind::Movies, &favorites, 9);
        assert!(message.text.contains("You have 6 item(s)"));
        let keyboard = message.keyboard.unwrap();
        assert!(keyboard.callbacks().any(|p| p == "fav_view:movies:6"));
    }
}
