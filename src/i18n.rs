// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Localized UI strings.
//!
//! Lookup never fails. An unsupported language resolves against English, a
//! key missing from a language resolves against English, and a key missing
//! everywhere resolves to itself.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Language every lookup ultimately falls back to.
pub const BASELINE: Language = Language::English;

type Table = HashMap<String, String>;

/// Bundled translation tables, keyed by language code.
static TRANSLATIONS: LazyLock<HashMap<&'static str, Table>> = LazyLock::new(|| {
    [
        ("en", include_str!("../locales/en.json")),
        ("fr", include_str!("../locales/fr.json")),
        ("es", include_str!("../locales/es.json")),
        ("ar", include_str!("../locales/ar.json")),
    ]
    .into_iter()
    .map(|(code, raw)| (code, parse_table(code, raw)))
    .collect()
});

fn parse_table(code: &str, raw: &str) -> Table {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(language = code, error = %e, "Failed to parse translation table");
        Table::new()
    })
}

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    French,
    Spanish,
    German,
    Italian,
    Portuguese,
    Arabic,
    Japanese,
    Korean,
    Chinese,
    Russian,
    Turkish,
    Hindi,
    Dutch,
    Polish,
}

impl Language {
    /// All supported languages, in picker order.
    pub const ALL: [Language; 15] = [
        Language::English,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Arabic,
        Language::Japanese,
        Language::Korean,
        Language::Chinese,
        Language::Russian,
        Language::Turkish,
        Language::Hindi,
        Language::Dutch,
        Language::Polish,
    ];

    /// Two-letter code stored in user profiles.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Arabic => "ar",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
            Language::Russian => "ru",
            Language::Turkish => "tr",
            Language::Hindi => "hi",
            Language::Dutch => "nl",
            Language::Polish => "pl",
        }
    }

    /// Native name with flag, as shown in the language picker.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "🇬🇧 English",
            Language::French => "🇫🇷 Français",
            Language::Spanish => "🇪🇸 Español",
            Language::German => "🇩🇪 Deutsch",
            Language::Italian => "🇮🇹 Italiano",
            Language::Portuguese => "🇵🇹 Português",
            Language::Arabic => "🇸🇦 العربية",
            Language::Japanese => "🇯🇵 日本語",
            Language::Korean => "🇰🇷 한국어",
            Language::Chinese => "🇨🇳 中文",
            Language::Russian => "🇷🇺 Русский",
            Language::Turkish => "🇹🇷 Türkçe",
            Language::Hindi => "🇮🇳 हिन्दी",
            Language::Dutch => "🇳🇱 Nederlands",
            Language::Polish => "🇵🇱 Polski",
        }
    }

    /// Locale tag sent to TMDB with every request.
    pub fn tmdb_code(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::French => "fr-FR",
            Language::Spanish => "es-ES",
            Language::German => "de-DE",
            Language::Italian => "it-IT",
            Language::Portuguese => "pt-PT",
            Language::Arabic => "ar-SA",
            Language::Japanese => "ja-JP",
            Language::Korean => "ko-KR",
            Language::Chinese => "zh-CN",
            Language::Russian => "ru-RU",
            Language::Turkish => "tr-TR",
            Language::Hindi => "hi-IN",
            Language::Dutch => "nl-NL",
            Language::Polish => "pl-PL",
        }
    }

    /// Parse a supported language code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Translate `key` into this language.
    pub fn text(self, key: &str) -> &str {
        get_text(self.code(), key)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    /// Unknown codes map to the baseline rather than failing the whole document.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Language::from_code(&code).unwrap_or_else(|| {
            tracing::warn!(code = %code, "Unsupported stored language, using baseline");
            BASELINE
        }))
    }
}

/// Look up a UI string with the three-tier fallback.
pub fn get_text<'a>(lang_code: &str, key: &'a str) -> &'a str {
    let baseline = TRANSLATIONS.get(BASELINE.code());
    let table = TRANSLATIONS.get(lang_code).or(baseline);

    table
        .and_then(|t| t.get(key))
        .or_else(|| baseline.and_then(|t| t.get(key)))
        .map(String::as_str)
        .unwrap_or(key)
}

/// Map a UI language code to its TMDB locale; unknown codes map to `en-US`.
pub fn tmdb_language(lang_code: &str) -> &'static str {
    Language::from_code(lang_code)
        .unwrap_or(BASELINE)
        .tmdb_code()
}

/// Substitute `{name}` placeholders in a translated template.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}
