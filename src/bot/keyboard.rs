// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inline keyboard builders.

use super::action::{search_callback, Callback, Listing};
use super::format::truncate_chars;
use crate::config::ITEMS_PER_PAGE;
use crate::i18n::Language;
use crate::models::{FavoriteEntry, MediaKind, Topic};
use serde::Serialize;

/// Favorite titles are cut to this many characters on list buttons.
const FAVORITE_TITLE_CHARS: usize = 30;

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Send a payload back to the bot
    CallbackData(String),
    /// Open inline mode in the current chat with this prefilled query
    SwitchInlineQueryCurrentChat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    #[serde(flatten)]
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(text: impl Into<String>, callback: &Callback) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::CallbackData(callback.to_string()),
        }
    }

    pub fn inline_search(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::SwitchInlineQueryCurrentChat(String::new()),
        }
    }
}

/// Rows of buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    /// Every button payload, row by row.
    pub fn callbacks(&self) -> impl Iterator<Item = &str> {
        self.inline_keyboard.iter().flatten().filter_map(|b| match &b.action {
            ButtonAction::CallbackData(data) => Some(data.as_str()),
            ButtonAction::SwitchInlineQueryCurrentChat(_) => None,
        })
    }
}

fn main_menu_row(lang: Language) -> Vec<Button> {
    vec![Button::callback(lang.text("main_menu"), &Callback::MainMenu)]
}

fn back_row(lang: Language, to: &Callback) -> Vec<Button> {
    vec![Button::callback(format!("⬅️ {}", lang.text("back")), to)]
}

/// `prev | 📄 page/total | next` for 1-based pages.
fn nav_row(lang: Language, page: u32, total: u32, to: impl Fn(u32) -> Callback) -> Vec<Button> {
    let mut row = Vec::with_capacity(3);
    if page > 1 {
        row.push(Button::callback(lang.text("previous"), &to(page - 1)));
    }
    row.push(Button::callback(format!("📄 {}/{}", page, total), &Callback::Noop));
    if page < total {
        row.push(Button::callback(lang.text("next"), &to(page + 1)));
    }
    row
}

pub fn main_menu(lang: Language) -> InlineKeyboard {
    let browse = |key: &str, listing| Button::callback(lang.text(key), &Callback::Browse(listing, 1));

    InlineKeyboard::new(vec![
        vec![
            browse("latest_movies", Listing::NowPlaying),
            browse("latest_series", Listing::AiringToday),
        ],
        vec![
            browse("trending", Listing::Trending),
            Button::inline_search(lang.text("search")),
        ],
        vec![
            browse("popular_movies", Listing::PopularMovies),
            browse("popular_series", Listing::PopularSeries),
        ],
        vec![
            Button::callback(format!("⭐ {}", lang.text("favorites")), &Callback::FavoritesMenu),
            Button::callback(
                format!("🔔 {}", lang.text("subscriptions")),
                &Callback::SubscriptionsMenu,
            ),
        ],
        vec![Button::callback(lang.text("language"), &Callback::LanguageMenu)],
    ])
}

/// Just a way back to the main menu.
pub fn back_to_menu(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new(vec![main_menu_row(lang)])
}

/// Keyboard under a listing entry. `item` is the entry shown, if any.
pub fn listing(
    lang: Language,
    listing: Listing,
    page: u32,
    total: u32,
    item: Option<(MediaKind, u64)>,
) -> InlineKeyboard {
    let mut rows = Vec::new();

    if let Some((kind, id)) = item {
        let mut actions = Vec::new();
        if matches!(listing, Listing::NowPlaying | Listing::AiringToday) {
            actions.push(Button::callback(lang.text("trailer"), &Callback::Trailer(kind, id)));
        }
        actions.push(Button::callback(lang.text("details"), &Callback::Details(kind, id)));
        rows.push(actions);
    }

    rows.push(nav_row(lang, page, total, |p| Callback::Browse(listing, p)));
    rows.push(main_menu_row(lang));
    InlineKeyboard::new(rows)
}

pub fn search_results(
    lang: Language,
    query: &str,
    page: u32,
    total: u32,
    item: Option<(MediaKind, u64)>,
) -> InlineKeyboard {
    let mut rows = Vec::new();
    if let Some((kind, id)) = item {
        rows.push(vec![Button::callback(lang.text("details"), &Callback::Details(kind, id))]);
    }
    rows.push(nav_row(lang, page, total, |p| search_callback(query, p)));
    rows.push(main_menu_row(lang));
    InlineKeyboard::new(rows)
}

/// Keyboard under a details view.
pub fn details(lang: Language, kind: MediaKind, id: u64) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            Button::callback(format!("⭐ {}", lang.text("fav_add_btn")), &Callback::FavoriteAdd(kind, id)),
            Button::callback(lang.text("trailer"), &Callback::Trailer(kind, id)),
        ],
        main_menu_row(lang),
    ])
}

pub fn language_picker() -> InlineKeyboard {
    let rows = Language::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|lang| Button::callback(lang.display_name(), &Callback::SetLanguage(*lang)))
                .collect()
        })
        .collect();
    InlineKeyboard::new(rows)
}

// ─── Favorites ───────────────────────────────────────────────────

pub fn favorites_menu(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            Button::callback(
                format!("🎬 {}", lang.text("fav_movies")),
                &Callback::FavoritesList(MediaKind::Movies),
            ),
            Button::callback(
                format!("📺 {}", lang.text("fav_series")),
                &Callback::FavoritesList(MediaKind::Series),
            ),
        ],
        main_menu_row(lang),
    ])
}

/// Number of favorites pages (at least 1).
pub fn favorites_page_count(len: usize) -> usize {
    len.div_ceil(ITEMS_PER_PAGE).max(1)
}

/// One page of favorites. `page` is 0-based and must be in range.
pub fn favorites_list(
    lang: Language,
    kind: MediaKind,
    favorites: &[FavoriteEntry],
    page: usize,
) -> InlineKeyboard {
    let total = favorites_page_count(favorites.len());
    let mut rows: Vec<Vec<Button>> = favorites
        .iter()
        .skip(page * ITEMS_PER_PAGE)
        .take(ITEMS_PER_PAGE)
        .map(|fav| {
            vec![
                Button::callback(
                    format!("{} {}", kind.emoji(), truncate_chars(&fav.title, FAVORITE_TITLE_CHARS)),
                    &Callback::FavoriteView(kind, fav.id),
                ),
                Button::callback("❌", &Callback::FavoriteRemove(kind, fav.id)),
            ]
        })
        .collect();

    let mut nav = Vec::new();
    if page > 0 {
        nav.push(Button::callback("⬅️", &Callback::FavoritesPage(kind, page - 1)));
    }
    if total > 1 {
        nav.push(Button::callback(format!("📄 {}/{}", page + 1, total), &Callback::Noop));
    }
    if page + 1 < total {
        nav.push(Button::callback("➡️", &Callback::FavoritesPage(kind, page + 1)));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    rows.push(back_row(lang, &Callback::FavoritesMenu));
    rows.push(main_menu_row(lang));
    InlineKeyboard::new(rows)
}

pub fn favorites_empty(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new(vec![back_row(lang, &Callback::FavoritesMenu), main_menu_row(lang)])
}

pub fn favorite_view(lang: Language, kind: MediaKind, id: u64) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![Button::callback(
            format!("❌ {}", lang.text("fav_remove_btn")),
            &Callback::FavoriteRemove(kind, id),
        )],
        back_row(lang, &Callback::FavoritesList(kind)),
        main_menu_row(lang),
    ])
}

// ─── Subscriptions ───────────────────────────────────────────────

fn topic_label(lang: Language, topic: Topic) -> String {
    format!("{} {}", topic.emoji(), lang.text(topic.name_key()))
}

/// Toggle grid over the whole catalog, two per row.
pub fn subscriptions(lang: Language, subscribed: &[Topic]) -> InlineKeyboard {
    let mut rows: Vec<Vec<Button>> = Topic::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|topic| {
                    let check = if subscribed.contains(topic) { "✅" } else { "⬜" };
                    Button::callback(
                        format!("{} {}", check, topic_label(lang, *topic)),
                        &Callback::SubscriptionToggle(topic.key().to_string()),
                    )
                })
                .collect()
        })
        .collect();

    rows.push(vec![Button::callback(
        format!("📋 {}", lang.text("my_subscriptions")),
        &Callback::MySubscriptions,
    )]);
    rows.push(main_menu_row(lang));
    InlineKeyboard::new(rows)
}

pub fn my_subscriptions(lang: Language, subscribed: &[Topic]) -> InlineKeyboard {
    let mut rows: Vec<Vec<Button>> = subscribed
        .iter()
        .map(|topic| {
            vec![
                Button::callback(topic_label(lang, *topic), &Callback::Noop),
                Button::callback(
                    format!("🔕 {}", lang.text("unsubscribe")),
                    &Callback::Unsubscribe(topic.key().to_string()),
                ),
            ]
        })
        .collect();

    rows.push(back_row(lang, &Callback::SubscriptionsMenu));
    rows.push(main_menu_row(lang));
    InlineKeyboard::new(rows)
}
