// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML message formatting.

use crate::config::MAX_PAGES;
use crate::i18n::Language;
use crate::models::{Genre, MediaItem, MediaKind, MovieDetails, SeriesDetails};

const OVERVIEW_MAX_CHARS: usize = 300;
const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Escape text for interpolation into an HTML message.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Overviews longer than 300 characters become 297 characters plus "...".
pub fn truncate_overview(text: &str) -> String {
    if text.chars().count() > OVERVIEW_MAX_CHARS {
        format!("{}...", truncate_chars(text, OVERVIEW_MAX_CHARS - 3))
    } else {
        text.to_string()
    }
}

/// Remote page count as shown to users: at least 1, at most [`MAX_PAGES`].
pub fn page_total(total_pages: u32) -> u32 {
    total_pages.clamp(1, MAX_PAGES)
}

/// Four-digit year of an ISO date, or empty.
pub fn year(date: Option<&str>) -> &str {
    date.map(|d| truncate_chars(d, 4)).unwrap_or("")
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn title_or_unknown(lang: Language, title: Option<&str>) -> String {
    escape_html(non_empty(title).unwrap_or_else(|| lang.text("unknown_title")))
}

fn overview_or_default(lang: Language, overview: Option<&str>) -> String {
    escape_html(non_empty(overview).unwrap_or_else(|| lang.text("no_overview")))
}

fn genre_list(genres: &[Genre]) -> String {
    let names: Vec<&str> = genres.iter().take(3).map(|g| g.name.as_str()).collect();
    escape_html(&names.join(", "))
}

/// Listing card: title, rating and date, then the (truncated) overview.
pub fn format_item(item: &MediaItem, lang: Language) -> String {
    let date = item.date().map(|d| truncate_chars(d, 10)).unwrap_or("N/A");
    let overview = non_empty(item.overview.as_deref())
        .map(truncate_overview)
        .unwrap_or_else(|| lang.text("no_overview").to_string());

    format!(
        "<b>{}</b>\n⭐ {:.1}/10 | 📅 {}\n{}\n{}",
        title_or_unknown(lang, item.display_title()),
        item.vote_average,
        escape_html(date),
        SEPARATOR,
        escape_html(&overview)
    )
}

pub fn format_movie_details(movie: &MovieDetails, lang: Language) -> String {
    let runtime = movie
        .runtime
        .filter(|m| *m > 0)
        .map(|m| format!("{} {}", m, lang.text("minutes")))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "{} <b>{}</b>\n\n{}: {:.1}/10\n{}: {}\n{}: {}\n{}: {}\n\n{}\n{}",
        MediaKind::Movies.emoji(),
        title_or_unknown(lang, movie.title.as_deref()),
        lang.text("rating"),
        movie.vote_average,
        lang.text("release"),
        escape_html(non_empty(movie.release_date.as_deref()).unwrap_or("N/A")),
        lang.text("runtime"),
        runtime,
        lang.text("genres"),
        genre_list(&movie.genres),
        lang.text("overview"),
        overview_or_default(lang, movie.overview.as_deref()),
    )
}

pub fn format_series_details(series: &SeriesDetails, lang: Language) -> String {
    let mut text = format!(
        "{} <b>{}</b>\n\n{}: {:.1}/10\n{}: {}\n{}: {} | {}: {}\n",
        MediaKind::Series.emoji(),
        title_or_unknown(lang, series.name.as_deref()),
        lang.text("rating"),
        series.vote_average,
        lang.text("first_aired"),
        escape_html(non_empty(series.first_air_date.as_deref()).unwrap_or("N/A")),
        lang.text("seasons"),
        series.number_of_seasons.unwrap_or(0),
        lang.text("episodes"),
        series.number_of_episodes.unwrap_or(0),
    );
    if let Some(status) = non_empty(series.status.as_deref()) {
        text.push_str(&format!("{}: {}\n", lang.text("status"), escape_html(status)));
    }
    text.push_str(&format!(
        "{}: {}\n\n{}\n{}",
        lang.text("genres"),
        genre_list(&series.genres),
        lang.text("overview"),
        overview_or_default(lang, series.overview.as_deref()),
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & Jerry <3 \"x\""), "Tom &amp; Jerry &lt;3 &quot;x&quot;");
    }

    #[test]
    fn test_truncate_overview() {
        let short = "a".repeat(300);
        assert_eq!(truncate_overview(&short), short);

        let long = "é".repeat(301);
        let cut = truncate_overview(&long);
        assert_eq!(cut.chars().count(), 300);
        assert!(cut.ends_with("é..."));
    }

    #[test]
    fn test_page_total_is_capped() {
        assert_eq!(page_total(0), 1);
        assert_eq!(page_total(7), 7);
        assert_eq!(page_total(500), MAX_PAGES);
    }

    #[test]
    fn test_format_item() {
        let item = MediaItem {
            id: 603,
            title: Some("The <Matrix>".to_string()),
            overview: Some("Neo & Trinity".to_string()),
            vote_average: 8.234,
            release_date: Some("1999-03-30".to_string()),
            ..Default::default()
        };
        let text = format_item(&item, Language::English);
        assert!(text.starts_with("<b>The &lt;Matrix&gt;</b>\n⭐ 8.2/10 | 📅 1999-03-30\n"));
        assert!(text.ends_with("Neo &amp; Trinity"));
    }

    #[test]
    fn test_format_item_defaults() {
        let item = MediaItem {
            id: 1,
            ..Default::default()
        };
        let text = format_item(&item, Language::English);
        assert!(text.contains("<b>Unknown</b>"));
        assert!(text.contains("📅 N/A"));
        assert!(text.ends_with("No description available."));
    }

    #[test]
    fn test_movie_details_limits_genres() {
        let movie = MovieDetails {
            id: 603,
            title: Some("The Matrix".to_string()),
            runtime: Some(136),
            genres: ["Action", "Sci-Fi", "Thriller", "Drama"]
                .iter()
                .enumerate()
                .map(|(i, name)| Genre {
                    id: i as u64,
                    name: name.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        let text = format_movie_details(&movie, Language::English);
        assert!(text.contains("Action, Sci-Fi, Thriller\n"));
        assert!(!text.contains("Drama"));
        assert!(text.contains("136 min"));
    }

    #[test]
    fn test_year() {
        assert_eq!(year(Some("2011-04-17")), "2011");
        assert_eq!(year(None), "");
    }
}
