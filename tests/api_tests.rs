// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP surface tests.
//!
//! These tests verify that:
//! 1. Public routes answer without credentials
//! 2. Bridge routes reject missing or wrong bearer tokens
//! 3. Oversized updates are rejected before reaching the bot
//! 4. Subscriber lookup validates the topic

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::TEST_TOKEN;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn post_update(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/updates")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_subscribers(topic: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/topics/{}/subscribers", topic))
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_and_banner() {
    let app = common::create_test_app().await;

    let (status, body) = send(
        &app.router,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bot"], "running");
    assert!(body["build_id"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_updates_require_token() {
    let app = common::create_test_app().await;
    let update = json!({"user_id": 1, "type": "command", "text": "/start"});

    let (status, body) = send(&app.router, post_update(None, update.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app.router, post_update(Some("wrong"), update.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, post_update(Some(TEST_TOKEN), update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["mode"], "send");
    assert!(body["notice"].is_null());

    // Rejected requests never touched the store; the accepted one did
    assert!(app.prefs_path().exists());
}

#[tokio::test]
async fn test_subscribers_require_token() {
    let app = common::create_test_app().await;
    let request = Request::builder()
        .uri("/api/topics/drama/subscribers")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_updates_are_rejected() {
    let app = common::create_test_app().await;

    let cases = [
        json!({"user_id": 1, "type": "command", "text": "x".repeat(4097)}),
        json!({"user_id": 1, "type": "callback", "data": "x".repeat(65)}),
        json!({"user_id": 1, "type": "inline_query", "query": "x".repeat(257)}),
    ];
    for update in cases {
        let (status, body) = send(&app.router, post_update(Some(TEST_TOKEN), update)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }
    assert!(!app.prefs_path().exists());
}

#[tokio::test]
async fn test_inline_query_update_returns_results() {
    let app = common::create_test_app().await;
    let update = json!({"user_id": 3, "type": "inline_query", "query": "matrix"});

    let (status, body) = send(&app.router, post_update(Some(TEST_TOKEN), update)).await;
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "🎬 The Matrix (1999)");
}

#[tokio::test]
async fn test_subscriber_lookup() {
    let app = common::create_test_app().await;

    for user_id in [30, 10] {
        let update = json!({"user_id": user_id, "type": "callback", "data": "sub_toggle:horror"});
        let (status, _) = send(&app.router, post_update(Some(TEST_TOKEN), update)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app.router, get_subscribers("horror")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"topic": "horror", "subscribers": [10, 30]}));

    let (status, body) = send(&app.router, get_subscribers("comedy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscribers"], json!([]));

    let (status, body) = send(&app.router, get_subscribers("westerns")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
