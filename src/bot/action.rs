// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed commands and button payloads.
//!
//! Button payloads are `name[:arg[:arg]]` strings limited to
//! [`MAX_CALLBACK_DATA`] bytes. [`Callback`]'s `Display` produces exactly
//! what [`Callback::parse`] accepts.

use crate::i18n::Language;
use crate::models::MediaKind;
use std::fmt;

/// Largest button payload the chat network accepts.
pub const MAX_CALLBACK_DATA: usize = 64;

/// A slash command sent as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Movies,
    Series,
    Trending,
    /// `/search` with its (possibly absent) query
    Search(Option<String>),
    Language,
    Favorites,
    Subscriptions,
}

impl Command {
    /// Parse `/name[@bot] [args]`. Returns `None` for plain text and
    /// unknown commands.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;

        let (head, rest) = match body.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (body, ""),
        };
        let name = head.split('@').next().unwrap_or(head);

        let command = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "movies" => Command::Movies,
            "series" => Command::Series,
            "trending" => Command::Trending,
            "search" => Command::Search((!rest.is_empty()).then(|| rest.to_string())),
            "language" => Command::Language,
            "favorites" => Command::Favorites,
            "subscriptions" => Command::Subscriptions,
            _ => return None,
        };
        Some(command)
    }
}

/// Paginated remote listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    NowPlaying,
    PopularMovies,
    AiringToday,
    PopularSeries,
    Trending,
}

impl Listing {
    fn tag(self) -> &'static str {
        match self {
            Listing::NowPlaying => "movies",
            Listing::PopularMovies => "popular_movies",
            Listing::AiringToday => "series",
            Listing::PopularSeries => "popular_series",
            Listing::Trending => "trending",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "movies" => Some(Listing::NowPlaying),
            "popular_movies" => Some(Listing::PopularMovies),
            "series" => Some(Listing::AiringToday),
            "popular_series" => Some(Listing::PopularSeries),
            "trending" => Some(Listing::Trending),
            _ => None,
        }
    }

    /// Fixed media kind of the listing; `None` for mixed listings.
    pub fn kind(self) -> Option<MediaKind> {
        match self {
            Listing::NowPlaying | Listing::PopularMovies => Some(MediaKind::Movies),
            Listing::AiringToday | Listing::PopularSeries => Some(MediaKind::Series),
            Listing::Trending => None,
        }
    }
}

/// A button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    MainMenu,
    Noop,
    Browse(Listing, u32),
    Search { query: String, page: u32 },
    Details(MediaKind, u64),
    Trailer(MediaKind, u64),
    LanguageMenu,
    SetLanguage(Language),
    FavoritesMenu,
    FavoritesList(MediaKind),
    /// 0-based page
    FavoritesPage(MediaKind, usize),
    FavoriteAdd(MediaKind, u64),
    FavoriteRemove(MediaKind, u64),
    FavoriteView(MediaKind, u64),
    SubscriptionsMenu,
    /// Topic keys stay raw; the store validates them.
    SubscriptionToggle(String),
    MySubscriptions,
    Unsubscribe(String),
}

impl Callback {
    /// Parse a button payload. Returns `None` for anything malformed.
    pub fn parse(data: &str) -> Option<Self> {
        let (name, args) = data.split_once(':').unwrap_or((data, ""));

        let callback = match name {
            "main_menu" => Callback::MainMenu,
            "noop" => Callback::Noop,
            "language" => Callback::LanguageMenu,
            "favorites" => Callback::FavoritesMenu,
            "subscriptions" => Callback::SubscriptionsMenu,
            "sub_my" => Callback::MySubscriptions,

            "search" => {
                // Query is percent-encoded so it never contains ':'
                let (raw, page) = match args.rsplit_once(':') {
                    Some((raw, page)) => (raw, page.parse().ok()?),
                    None => (args, 1),
                };
                let query = urlencoding::decode(raw).ok()?.into_owned();
                if query.is_empty() {
                    return None;
                }
                Callback::Search { query, page }
            }

            "details_movie" => Callback::Details(MediaKind::Movies, args.parse().ok()?),
            "details_series" | "details_tv" => {
                Callback::Details(MediaKind::Series, args.parse().ok()?)
            }
            "trailer_movie" => Callback::Trailer(MediaKind::Movies, args.parse().ok()?),
            "trailer_series" | "trailer_tv" => {
                Callback::Trailer(MediaKind::Series, args.parse().ok()?)
            }

            "set_lang" => Callback::SetLanguage(Language::from_code(args)?),

            "fav_list" => Callback::FavoritesList(args.parse().ok()?),
            "fav_page" => {
                let (kind, page) = args.split_once(':')?;
                Callback::FavoritesPage(kind.parse().ok()?, page.parse().ok()?)
            }
            "fav_add" | "fav_remove" | "fav_view" => {
                let (kind, id) = args.split_once(':')?;
                let (kind, id) = (kind.parse().ok()?, id.parse().ok()?);
                match name {
                    "fav_add" => Callback::FavoriteAdd(kind, id),
                    "fav_remove" => Callback::FavoriteRemove(kind, id),
                    _ => Callback::FavoriteView(kind, id),
                }
            }

            "sub_toggle" if !args.is_empty() => Callback::SubscriptionToggle(args.to_string()),
            "sub_off" if !args.is_empty() => Callback::Unsubscribe(args.to_string()),

            tag => Callback::Browse(Listing::from_tag(tag)?, args.parse().ok()?),
        };
        Some(callback)
    }
}

fn details_tag(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movies => "movie",
        MediaKind::Series => "series",
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::MainMenu => f.write_str("main_menu"),
            Callback::Noop => f.write_str("noop"),
            Callback::Browse(listing, page) => write!(f, "{}:{}", listing.tag(), page),
            Callback::Search { query, page } => {
                write!(f, "search:{}:{}", urlencoding::encode(query), page)
            }
            Callback::Details(kind, id) => write!(f, "details_{}:{}", details_tag(*kind), id),
            Callback::Trailer(kind, id) => write!(f, "trailer_{}:{}", details_tag(*kind), id),
            Callback::LanguageMenu => f.write_str("language"),
            Callback::SetLanguage(lang) => write!(f, "set_lang:{}", lang.code()),
            Callback::FavoritesMenu => f.write_str("favorites"),
            Callback::FavoritesList(kind) => write!(f, "fav_list:{}", kind),
            Callback::FavoritesPage(kind, page) => write!(f, "fav_page:{}:{}", kind, page),
            Callback::FavoriteAdd(kind, id) => write!(f, "fav_add:{}:{}", kind, id),
            Callback::FavoriteRemove(kind, id) => write!(f, "fav_remove:{}:{}", kind, id),
            Callback::FavoriteView(kind, id) => write!(f, "fav_view:{}:{}", kind, id),
            Callback::SubscriptionsMenu => f.write_str("subscriptions"),
            Callback::SubscriptionToggle(topic) => write!(f, "sub_toggle:{}", topic),
            Callback::MySubscriptions => f.write_str("sub_my"),
            Callback::Unsubscribe(topic) => write!(f, "sub_off:{}", topic),
        }
    }
}

/// Build a search payload, dropping trailing characters of `query` until
/// the encoded payload fits in [`MAX_CALLBACK_DATA`].
pub fn search_callback(query: &str, page: u32) -> Callback {
    let mut query = query.to_string();
    loop {
        let callback = Callback::Search {
            query: query.clone(),
            page,
        };
        if callback.to_string().len() <= MAX_CALLBACK_DATA || query.pop().is_none() {
            return callback;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/movies@ReelBot"), Some(Command::Movies));
        assert_eq!(
            Command::parse("/search   The Matrix "),
            Some(Command::Search(Some("The Matrix".to_string())))
        );
        assert_eq!(Command::parse("/search@ReelBot"), Some(Command::Search(None)));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("hello"), None);
    }

    #[test]
    fn test_callback_parse() {
        assert_eq!(
            Callback::parse("popular_series:3"),
            Some(Callback::Browse(Listing::PopularSeries, 3))
        );
        assert_eq!(
            Callback::parse("details_tv:1399"),
            Some(Callback::Details(MediaKind::Series, 1399))
        );
        assert_eq!(
            Callback::parse("fav_page:series:2"),
            Some(Callback::FavoritesPage(MediaKind::Series, 2))
        );
        assert_eq!(
            Callback::parse("set_lang:ja"),
            Some(Callback::SetLanguage(Language::Japanese))
        );
        assert_eq!(
            Callback::parse("search:star%20wars:2"),
            Some(Callback::Search {
                query: "star wars".to_string(),
                page: 2
            })
        );
        assert_eq!(
            Callback::parse("search:dune"),
            Some(Callback::Search {
                query: "dune".to_string(),
                page: 1
            })
        );
    }

    #[test]
    fn test_callback_parse_rejects_malformed() {
        for data in [
            "movies:abc",
            "movies",
            "details_movie:",
            "fav_add:movies",
            "fav_add:books:1",
            "set_lang:xx",
            "sub_toggle:",
            "search:",
            "bogus:1",
            "",
        ] {
            assert_eq!(Callback::parse(data), None, "{:?} should be rejected", data);
        }
    }

    #[test]
    fn test_display_is_parseable() {
        let callbacks = [
            Callback::Browse(Listing::Trending, 7),
            Callback::Details(MediaKind::Series, 1399),
            Callback::Trailer(MediaKind::Movies, 603),
            Callback::FavoriteRemove(MediaKind::Movies, 603),
            Callback::SubscriptionToggle("new_movies".to_string()),
            Callback::Search {
                query: "Amélie: le film".to_string(),
                page: 4,
            },
        ];
        for callback in callbacks {
            assert_eq!(Callback::parse(&callback.to_string()), Some(callback));
        }
    }

    #[test]
    fn test_search_callback_fits_limit() {
        let long = "a very long search query ".repeat(10);
        let callback = search_callback(&long, 12);
        assert!(callback.to_string().len() <= MAX_CALLBACK_DATA);
        assert!(matches!(callback, Callback::Search { page: 12, .. }));
    }
}
