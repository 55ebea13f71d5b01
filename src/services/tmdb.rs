// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TMDB v3 API client.
//!
//! Read-only: list, search, detail and video lookups. Every request carries
//! the API key and a TMDB locale. No retries and no caching.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{MediaItem, MovieDetails, Page, SeriesDetails, VideoList};
use serde::Deserialize;
use std::fmt;

/// Media filter for the trending endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingMedia {
    All,
    Movie,
    Tv,
}

impl fmt::Display for TrendingMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrendingMedia::All => "all",
            TrendingMedia::Movie => "movie",
            TrendingMedia::Tv => "tv",
        })
    }
}

/// Time window for the trending endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        })
    }
}

/// TMDB API client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    image_base: String,
    api_key: String,
}

impl TmdbClient {
    /// Build a client from config with the configured request timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.tmdb_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            image_base: config.tmdb_image_base.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    // ─── Lists ───────────────────────────────────────────────────

    pub async fn now_playing_movies(&self, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/movie/now_playing", &[], page, language).await
    }

    pub async fn popular_movies(&self, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/movie/popular", &[], page, language).await
    }

    pub async fn airing_today_series(&self, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/tv/airing_today", &[], page, language).await
    }

    pub async fn popular_series(&self, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/tv/popular", &[], page, language).await
    }

    pub async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
        language: &str,
    ) -> Result<Page<MediaItem>, AppError> {
        let path = format!("/trending/{}/{}", media, window);
        self.get_page(&path, &[], page, language).await
    }

    // ─── Search ──────────────────────────────────────────────────

    pub async fn search_movies(&self, query: &str, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/search/movie", &[("query", query)], page, language)
            .await
    }

    pub async fn search_series(&self, query: &str, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/search/tv", &[("query", query)], page, language)
            .await
    }

    /// Movies, series and people in one result list.
    pub async fn search_multi(&self, query: &str, page: u32, language: &str) -> Result<Page<MediaItem>, AppError> {
        self.get_page("/search/multi", &[("query", query)], page, language)
            .await
    }

    // ─── Details ─────────────────────────────────────────────────

    pub async fn movie_details(&self, id: u64, language: &str) -> Result<MovieDetails, AppError> {
        self.get_json(&format!("/movie/{}", id), &[], language).await
    }

    pub async fn series_details(&self, id: u64, language: &str) -> Result<SeriesDetails, AppError> {
        self.get_json(&format!("/tv/{}", id), &[], language).await
    }

    pub async fn movie_videos(&self, id: u64, language: &str) -> Result<VideoList, AppError> {
        self.get_json(&format!("/movie/{}/videos", id), &[], language)
            .await
    }

    pub async fn series_videos(&self, id: u64, language: &str) -> Result<VideoList, AppError> {
        self.get_json(&format!("/tv/{}/videos", id), &[], language)
            .await
    }

    /// Full poster URL, or `None` when the item has no poster.
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}", self.image_base, p.trim_start_matches('/')))
    }

    // ─── Transport ───────────────────────────────────────────────

    /// Paginated GET. Page numbers are 1-based; 0 is clamped to 1.
    async fn get_page(
        &self,
        path: &str,
        params: &[(&str, &str)],
        page: u32,
        language: &str,
    ) -> Result<Page<MediaItem>, AppError> {
        let page = page.max(1).to_string();
        let mut params = params.to_vec();
        params.push(("page", &page));
        self.get_json(path, &params, language).await
    }

    /// Generic GET request with JSON response.
    ///
    /// Only `path` is logged; the query string carries the API key.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        language: &str,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", language)])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::warn!(endpoint = path, error = %e, "TMDB request failed");
                AppError::TmdbApi(e.to_string())
            })?;

        self.check_response_json(path, response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(endpoint = path, status = status.as_u16(), "TMDB returned an error status");
            return Err(AppError::tmdb_status(status));
        }

        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(endpoint = path, error = %e, "Failed to decode TMDB response");
            AppError::TmdbApi(format!("Invalid response body: {}", e))
        })
    }
}
