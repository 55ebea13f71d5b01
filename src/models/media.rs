// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TMDB response records.

use serde::{Deserialize, Serialize};

/// TMDB media type tag on list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
    #[serde(other)]
    Other,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
            MediaType::Other => "other",
        }
    }
}

/// A paginated list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            total_results: 0,
        }
    }
}

/// Movie, series or person entry from list and search endpoints.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    /// Only present on mixed endpoints (trending/all, search/multi)
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl MediaItem {
    /// Title for movies, name for series.
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Release date for movies, first air date for series.
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Whether this entry is a movie or series (mixed endpoints only).
    pub fn is_title(&self) -> bool {
        matches!(self.media_type, Some(MediaType::Movie | MediaType::Tv))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// `/movie/{id}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// `/tv/{id}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// One entry of a `/videos` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl Video {
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

/// `/videos` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

impl VideoList {
    /// First YouTube video whose type is one of `kinds`.
    pub fn first_youtube(&self, kinds: &[&str]) -> Option<&Video> {
        self.results
            .iter()
            .find(|v| v.site == "YouTube" && kinds.contains(&v.kind.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_search_page_parses_mixed_results() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-30", "vote_average": 8.2},
                {"id": 1399, "media_type": "tv", "name": "Game of Thrones", "first_air_date": "2011-04-17"},
                {"id": 6384, "media_type": "person", "name": "Keanu Reeves"},
                {"id": 1, "media_type": "collection"}
            ],
            "total_pages": 3,
            "total_results": 55
        }"#;

        let page: Page<MediaItem> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results[3].media_type, Some(MediaType::Other));

        let titles: Vec<_> = page.results.iter().filter(|i| i.is_title()).collect();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1].display_title(), Some("Game of Thrones"));
        assert_eq!(titles[1].date(), Some("2011-04-17"));
    }

    #[test]
    fn test_first_youtube_respects_kinds() {
        let videos = VideoList {
            results: vec![
                Video {
                    key: "vimeo1".into(),
                    site: "Vimeo".into(),
                    kind: "Trailer".into(),
                    name: String::new(),
                },
                Video {
                    key: "teaser".into(),
                    site: "YouTube".into(),
                    kind: "Teaser".into(),
                    name: String::new(),
                },
            ],
        };

        assert!(videos.first_youtube(&["Trailer"]).is_none());
        let teaser = videos.first_youtube(&["Trailer", "Teaser"]).unwrap();
        assert_eq!(teaser.youtube_url(), "https://www.youtube.com/watch?v=teaser");
    }
}
