// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reelbot::config::Config;
use reelbot::db::PrefsStore;
use reelbot::routes::create_router;
use reelbot::services::TmdbClient;
use reelbot::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Bearer token accepted by the test app.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test_bot_token";

/// A test app plus the temp dir holding its preference file.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub fn prefs_path(&self) -> PathBuf {
        self.dir.path().join("user_prefs.json")
    }
}

/// Config pointing the TMDB client at `tmdb_base_url` and prefs into `dir`.
#[allow(dead_code)]
pub fn test_config(dir: &TempDir, tmdb_base_url: &str) -> Config {
    Config {
        tmdb_base_url: tmdb_base_url.to_string(),
        prefs_path: dir.path().join("user_prefs.json"),
        ..Config::test_default()
    }
}

/// Create a test app whose TMDB client talks to `tmdb_base_url`.
#[allow(dead_code)]
pub async fn create_test_app_with(tmdb_base_url: &str) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir, tmdb_base_url);
    let prefs = PrefsStore::open(&config.prefs_path)
        .await
        .expect("open prefs");
    let tmdb = TmdbClient::new(&config).expect("tmdb client");
    let state = Arc::new(AppState::new(config, prefs, tmdb));

    TestApp {
        router: create_router(state.clone()),
        state,
        dir,
    }
}

/// Create a test app backed by the mock TMDB server.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let base_url = spawn_mock_tmdb().await;
    create_test_app_with(&base_url).await
}

// ─── Mock TMDB ───────────────────────────────────────────────────

type Params = Query<HashMap<String, String>>;

/// API key the mock server accepts (matches `Config::test_default`).
const MOCK_API_KEY: &str = "test_api_key";

fn matrix() -> Value {
    json!({
        "id": 603,
        "media_type": "movie",
        "title": "The Matrix",
        "overview": "A hacker learns the truth.",
        "poster_path": "/matrix.jpg",
        "vote_average": 8.2,
        "release_date": "1999-03-30"
    })
}

fn thrones() -> Value {
    json!({
        "id": 1399,
        "media_type": "tv",
        "name": "Game of Thrones",
        "overview": "Seven noble families fight for control.",
        "poster_path": "/got.jpg",
        "vote_average": 8.4,
        "first_air_date": "2011-04-17"
    })
}

fn keanu() -> Value {
    json!({"id": 6384, "media_type": "person", "name": "Keanu Reeves"})
}

fn page(params: &HashMap<String, String>, results: Vec<Value>, total_pages: u32) -> Value {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": results.len()
    })
}

/// Reject requests without the expected key, like TMDB does.
fn authorized(params: &HashMap<String, String>) -> Result<(), Response> {
    if params.get("api_key").map(String::as_str) == Some(MOCK_API_KEY) && params.contains_key("language") {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7}))).into_response())
    }
}

async fn now_playing(Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    Json(page(&params, vec![matrix()], 120)).into_response()
}

async fn popular_movies(Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    Json(page(&params, vec![], 1)).into_response()
}

async fn airing_today() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response()
}

async fn popular_series(Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    Json(page(&params, vec![thrones()], 3)).into_response()
}

async fn trending(Path((media, window)): Path<(String, String)>, Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    if media != "all" || window != "week" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(page(&params, vec![keanu(), thrones(), matrix()], 10)).into_response()
}

async fn search(Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    match params.get("query").map(String::as_str) {
        Some("nothing") | None => Json(page(&params, vec![], 1)).into_response(),
        Some("people") => Json(page(&params, vec![keanu()], 1)).into_response(),
        Some("garbled") => (StatusCode::OK, "not json").into_response(),
        Some(_) => Json(page(&params, vec![keanu(), matrix(), thrones()], 2)).into_response(),
    }
}

async fn movie_details(Path(id): Path<u64>, Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    if id != 603 {
        return (StatusCode::NOT_FOUND, Json(json!({"status_code": 34}))).into_response();
    }
    Json(json!({
        "id": 603,
        "title": "The Matrix",
        "overview": "A hacker learns the truth.",
        "poster_path": "/matrix.jpg",
        "vote_average": 8.2,
        "release_date": "1999-03-30",
        "runtime": 136,
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
    }))
    .into_response()
}

async fn series_details(Path(id): Path<u64>, Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    if id != 1399 {
        return (StatusCode::NOT_FOUND, Json(json!({"status_code": 34}))).into_response();
    }
    Json(json!({
        "id": 1399,
        "name": "Game of Thrones",
        "overview": "Seven noble families fight for control.",
        "poster_path": "/got.jpg",
        "vote_average": 8.4,
        "first_air_date": "2011-04-17",
        "number_of_seasons": 8,
        "number_of_episodes": 73,
        "status": "Ended",
        "genres": [{"id": 18, "name": "Drama"}]
    }))
    .into_response()
}

/// Movie trailers exist only in English.
async fn movie_videos(Path(_id): Path<u64>, Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    let results = if params.get("language").map(String::as_str) == Some("en-US") {
        vec![
            json!({"key": "clip1", "site": "YouTube", "type": "Clip", "name": "Clip"}),
            json!({"key": "abc123", "site": "YouTube", "type": "Trailer", "name": "Trailer"}),
        ]
    } else {
        vec![]
    };
    Json(json!({"id": 603, "results": results})).into_response()
}

/// Series only have a teaser.
async fn series_videos(Path(id): Path<u64>, Query(params): Params) -> Response {
    if let Err(r) = authorized(&params) {
        return r;
    }
    Json(json!({
        "id": id,
        "results": [{"key": "tease1", "site": "YouTube", "type": "Teaser", "name": "Teaser"}]
    }))
    .into_response()
}

/// Start an in-process fake TMDB API and return its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_tmdb() -> String {
    let app = Router::new()
        .route("/movie/now_playing", get(now_playing))
        .route("/movie/popular", get(popular_movies))
        .route("/movie/{id}", get(movie_details))
        .route("/movie/{id}/videos", get(movie_videos))
        .route("/tv/airing_today", get(airing_today))
        .route("/tv/popular", get(popular_series))
        .route("/tv/{id}", get(series_details))
        .route("/tv/{id}/videos", get(series_videos))
        .route("/trending/{media}/{window}", get(trending))
        .route("/search/multi", get(search))
        .route("/search/movie", get(search))
        .route("/search/tv", get(search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock TMDB");
    let addr = listener.local_addr().expect("mock TMDB address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}", addr)
}
