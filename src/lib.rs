// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Reelbot: a localized movie & series browser for chat networks
//!
//! This crate provides the backend that renders bot screens from TMDB
//! data, keeps per-user preferences (language, favorites, topic
//! subscriptions) and serves them to a chat bridge over HTTP.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use bot::BotService;
use config::Config;
use db::PrefsStore;
use services::TmdbClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub prefs: PrefsStore,
    pub tmdb: TmdbClient,
    pub bot: BotService,
}

impl AppState {
    /// Wire the services together from already-opened parts.
    pub fn new(config: Config, prefs: PrefsStore, tmdb: TmdbClient) -> Self {
        let bot = BotService::new(prefs.clone(), tmdb.clone());
        Self {
            config,
            prefs,
            tmdb,
            bot,
        }
    }
}
