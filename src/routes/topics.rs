// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscriber lookup for notification fan-out.

use crate::error::{AppError, Result};
use crate::models::{Topic, UserId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/topics/{topic}/subscribers", get(get_subscribers))
}

#[derive(Debug, Serialize)]
pub struct SubscribersResponse {
    pub topic: Topic,
    pub subscribers: Vec<UserId>,
}

async fn get_subscribers(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Result<Json<SubscribersResponse>> {
    let topic: Topic = topic
        .parse()
        .map_err(|e: crate::models::UnknownTopic| AppError::NotFound(e.to_string()))?;

    let subscribers = state.prefs.subscribers_of(topic).await?;
    tracing::info!(%topic, count = subscribers.len(), "Subscriber lookup");

    Ok(Json(SubscribersResponse { topic, subscribers }))
}
