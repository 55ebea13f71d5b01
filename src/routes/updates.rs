// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Update intake for the chat bridge.
//!
//! The bridge forwards each command, button press or inline query and
//! delivers whatever comes back.

use crate::bot::action::MAX_CALLBACK_DATA;
use crate::bot::{BotResponse, InlineAnswer};
use crate::error::{AppError, Result};
use crate::models::UserId;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Longest message text the chat network delivers.
const MAX_TEXT_BYTES: usize = 4096;
/// Longest inline query the chat network delivers.
const MAX_INLINE_QUERY_BYTES: usize = 256;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/updates", post(post_update))
}

/// One update forwarded by the bridge.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub user_id: UserId,
    #[serde(flatten)]
    pub kind: UpdateKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateKind {
    Command { text: String },
    Callback { data: String },
    InlineQuery { query: String },
}

impl UpdateKind {
    fn validate(&self) -> Result<()> {
        let (field, len, max) = match self {
            UpdateKind::Command { text } => ("text", text.len(), MAX_TEXT_BYTES),
            UpdateKind::Callback { data } => ("data", data.len(), MAX_CALLBACK_DATA),
            UpdateKind::InlineQuery { query } => ("query", query.len(), MAX_INLINE_QUERY_BYTES),
        };
        if len > max {
            return Err(AppError::BadRequest(format!(
                "{} is {} bytes, limit is {}",
                field, len, max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UpdateResponse {
    Bot(BotResponse),
    Inline(InlineAnswer),
}

async fn post_update(
    State(state): State<Arc<AppState>>,
    Json(update): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    update.kind.validate()?;
    let user_id = update.user_id;

    let response = match &update.kind {
        UpdateKind::Command { text } => {
            UpdateResponse::Bot(state.bot.handle_command(user_id, text).await)
        }
        UpdateKind::Callback { data } => {
            UpdateResponse::Bot(state.bot.handle_callback(user_id, data).await)
        }
        UpdateKind::InlineQuery { query } => {
            UpdateResponse::Inline(state.bot.handle_inline_query(user_id, query).await)
        }
    };

    Ok(Json(response))
}
