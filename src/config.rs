// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The bot credential and the TMDB API key are required; everything else
//! has a default suitable for a single-instance deployment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Favorites shown per page in the favorites list.
pub const ITEMS_PER_PAGE: usize = 5;

/// Upper bound on remote pagination shown to users.
pub const MAX_PAGES: u32 = 50;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const DEFAULT_PREFS_PATH: &str = "user_prefs.json";
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Values shipped in sample `.env` files; treated as unset.
const PLACEHOLDERS: &[&str] = &["YOUR_TELEGRAM_BOT_TOKEN_HERE", "YOUR_TMDB_API_KEY_HERE"];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat bot credential. Also the bearer secret for the update API.
    pub bot_token: String,
    /// TMDB v3 API key
    pub tmdb_api_key: String,
    /// TMDB API base URL
    pub tmdb_base_url: String,
    /// Base URL prepended to poster paths
    pub tmdb_image_base: String,
    /// Per-request timeout for TMDB calls
    pub tmdb_timeout: Duration,
    /// Location of the preferences JSON document
    pub prefs_path: PathBuf,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let tmdb_timeout = match env::var("TMDB_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("TMDB_TIMEOUT_SECS"))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            tmdb_api_key: required("TMDB_API_KEY")?,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            tmdb_image_base: env::var("TMDB_IMAGE_BASE")
                .unwrap_or_else(|_| DEFAULT_TMDB_IMAGE_BASE.to_string()),
            tmdb_timeout: Duration::from_secs(tmdb_timeout),
            prefs_path: env::var("PREFS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PREFS_PATH)),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
        })
    }

    /// Config for tests. Points TMDB at an unroutable local address.
    pub fn test_default() -> Self {
        Self {
            bot_token: "test_bot_token".to_string(),
            tmdb_api_key: "test_api_key".to_string(),
            tmdb_base_url: "http://127.0.0.1:9".to_string(),
            tmdb_image_base: DEFAULT_TMDB_IMAGE_BASE.to_string(),
            tmdb_timeout: Duration::from_secs(2),
            prefs_path: PathBuf::from(DEFAULT_PREFS_PATH),
            port: DEFAULT_PORT,
        }
    }
}

/// Read a required variable, rejecting blanks and sample placeholders.
fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))?;

    if value.is_empty() || PLACEHOLDERS.contains(&value.as_str()) {
        return Err(ConfigError::Missing(name));
    }
    Ok(value)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test touches the process environment to avoid cross-test races.
    #[test]
    fn test_config_from_env() {
        env::set_var("BOT_TOKEN", "YOUR_TELEGRAM_BOT_TOKEN_HERE");
        env::set_var("TMDB_API_KEY", "test_key");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("BOT_TOKEN"))
        ));

        env::set_var("BOT_TOKEN", " 123:abc ");
        env::set_var("TMDB_TIMEOUT_SECS", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("TMDB_TIMEOUT_SECS"))
        ));

        env::remove_var("TMDB_TIMEOUT_SECS");
        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.tmdb_api_key, "test_key");
        assert_eq!(config.tmdb_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
