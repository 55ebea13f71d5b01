// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rendered replies handed back to the chat bridge.

use super::keyboard::InlineKeyboard;
use serde::Serialize;

/// How a message reaches the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Post a new message
    Send,
    /// Edit (or delete and resend) the message that carried the button
    Replace,
}

/// Toast shown in answer to a button press.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub text: String,
    /// Modal alert instead of a transient toast
    pub alert: bool,
}

/// One HTML message, optionally with a photo and keyboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Photo URL; when set, `text` is the caption
    pub photo: Option<String>,
    pub keyboard: Option<InlineKeyboard>,
    pub mode: DeliveryMode,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>, mode: DeliveryMode) -> Self {
        Self {
            text: text.into(),
            photo: None,
            keyboard: None,
            mode,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }
}

/// Everything produced for one command or button press.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BotResponse {
    pub notice: Option<Notice>,
    pub messages: Vec<OutgoingMessage>,
}

impl BotResponse {
    /// No visible effect. Used for no-ops and absorbed faults.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn message(message: OutgoingMessage) -> Self {
        Self {
            notice: None,
            messages: vec![message],
        }
    }

    pub fn notice(text: impl Into<String>, alert: bool) -> Self {
        Self {
            notice: Some(Notice {
                text: text.into(),
                alert,
            }),
            messages: Vec::new(),
        }
    }

    pub fn with_notice(mut self, text: impl Into<String>, alert: bool) -> Self {
        self.notice = Some(Notice {
            text: text.into(),
            alert,
        });
        self
    }

    pub fn with_message(mut self, message: OutgoingMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// One inline-mode result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineArticle {
    /// Stable per item, at most 64 bytes
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    /// Message posted when the article is picked
    pub message_text: String,
    /// Whether `message_text` is HTML
    pub html: bool,
}

/// Answer to an inline query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineAnswer {
    pub results: Vec<InlineArticle>,
    /// Seconds the chat network may cache the answer
    pub cache_time: u32,
}
