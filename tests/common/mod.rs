#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use stellarmix::{
    config::Settings,
    management::{CredentialManager, LocalStorage},
};
use tempfile::TempDir;

pub const VALID_TOKEN: &str = "valid-token";
pub const GOOD_CODE: &str = "good-code";
pub const CLIENT_SECRET: &str = "test-secret";

/// Recorded traffic and switches of the mock provider.
#[derive(Default)]
pub struct MockState {
    pub search_queries: Mutex<Vec<String>>,
    pub play_requests: Mutex<Vec<Value>>,
    pub pause_calls: AtomicUsize,
    pub playing_context: Mutex<Option<String>>,
    pub fail_search: AtomicBool,
    pub fail_weather: AtomicBool,
    pub fail_sun: AtomicBool,
    pub no_devices: AtomicBool,
    pub forbid_play: AtomicBool,
    /// Answer 200 with a body that is not JSON.
    pub garble_bodies: AtomicBool,
    pub followed: Mutex<Vec<String>>,
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .route("/v1/me", get(profile))
            .route("/v1/me/player/currently-playing", get(currently_playing))
            .route("/v1/me/player/devices", get(devices))
            .route("/v1/me/player/play", put(play))
            .route("/v1/me/player/pause", put(pause))
            .route("/v1/me/player/next", post(no_content))
            .route("/v1/me/player/previous", post(no_content))
            .route("/v1/me/player/volume", put(no_content))
            .route("/v1/me/player/shuffle", put(no_content))
            .route(
                "/v1/recommendations/available-genre-seeds",
                get(genres),
            )
            .route(
                "/v1/playlists/{id}/followers",
                put(follow).delete(unfollow),
            )
            .route("/v1/playlists/{id}/followers/contains", get(follows))
            .route("/weather-api/weather", get(weather))
            .route("/sun/json", get(sun))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        MockServer {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn settings(&self, data_dir: &Path) -> Settings {
        settings_for(&self.base_url, data_dir, true)
    }
}

pub fn settings_for(base_url: &str, data_dir: &Path, weather_key: bool) -> Settings {
    let mut vars: HashMap<&str, String> = HashMap::new();
    vars.insert("SPOTIFY_API_AUTH_CLIENT_ID", "test-client".to_string());
    vars.insert("SPOTIFY_API_AUTH_CLIENT_SECRET", CLIENT_SECRET.to_string());
    vars.insert("SPOTIFY_API_AUTH_URL", format!("{base_url}/authorize"));
    vars.insert("SPOTIFY_API_TOKEN_URL", format!("{base_url}/api/token"));
    vars.insert("SPOTIFY_API_URL", format!("{base_url}/v1"));
    vars.insert("OPENWEATHER_API_URL", format!("{base_url}/weather-api"));
    vars.insert("SUN_API_URL", format!("{base_url}/sun"));
    vars.insert("SERVER_ADDRESS", "127.0.0.1:0".to_string());
    vars.insert(
        "STELLARMIX_DATA_DIR",
        data_dir.to_string_lossy().into_owned(),
    );
    if weather_key {
        vars.insert("OPENWEATHER_API_KEY", "weather-key".to_string());
    }

    Settings::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub async fn open_storage(dir: &TempDir) -> LocalStorage {
    LocalStorage::open(dir.path().join("storage.json"))
        .await
        .unwrap()
}

/// Stores `token` as a logged-in credential valid for an hour.
pub async fn log_in(storage: &LocalStorage, token: &str) {
    CredentialManager::new(storage.clone())
        .persist_login(token, 3600)
        .await
        .unwrap();
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
    )
        .into_response()
}

fn garbled() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        "this is not json",
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let good = form.get("grant_type").map(String::as_str) == Some("authorization_code")
        && form.get("code").map(String::as_str) == Some(GOOD_CODE)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET);

    if !good {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": VALID_TOKEN,
        "token_type": "Bearer",
        "scope": "user-read-private",
        "expires_in": 3600,
        "refresh_token": "refresh"
    }))
    .into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.garble_bodies.load(Ordering::SeqCst) {
        return garbled();
    }
    if state.fail_search.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"status": 500, "message": "Server error"}})),
        )
            .into_response();
    }

    state
        .search_queries
        .lock()
        .unwrap()
        .push(params.get("q").cloned().unwrap_or_default());

    Json(json!({
        "playlists": {
            "items": [
                {
                    "id": "pl1",
                    "name": "Sunny Day",
                    "uri": "spotify:playlist:pl1",
                    "images": [{"url": "https://img/1", "height": 640, "width": 640}],
                    "owner": {"id": "spotify", "display_name": "Spotify"},
                    "description": "Bright tunes"
                },
                null,
                {
                    "id": "pl2",
                    "name": "Night Jazz",
                    "uri": "spotify:playlist:pl2",
                    "images": []
                }
            ],
            "total": 3
        }
    }))
    .into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": "listener", "display_name": "Listener", "email": null, "product": "premium"}))
        .into_response()
}

async fn currently_playing(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    match state.playing_context.lock().unwrap().clone() {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(uri) => Json(json!({
            "is_playing": true,
            "progress_ms": 1000,
            "item": {
                "id": "t1",
                "name": "Track",
                "uri": "spotify:track:t1",
                "artists": [{"id": "a1", "name": "Artist"}],
                "duration_ms": 200000
            },
            "context": {"uri": uri, "type": "playlist"}
        }))
        .into_response(),
    }
}

async fn devices(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.no_devices.load(Ordering::SeqCst) {
        return Json(json!({"devices": []})).into_response();
    }

    Json(json!({
        "devices": [
            {"id": "phone", "name": "Phone", "type": "Smartphone", "is_active": false, "volume_percent": 40},
            {"id": "laptop", "name": "Laptop", "type": "Computer", "is_active": true, "volume_percent": 70}
        ]
    }))
    .into_response()
}

async fn play(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.forbid_play.load(Ordering::SeqCst) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"status": 403, "message": "Player command failed: Premium required", "reason": "PREMIUM_REQUIRED"}})),
        )
            .into_response();
    }

    let mut recorded: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    if let Some(device) = params.get("device_id") {
        recorded = json!({"device_id": device, "body": recorded});
    }
    if let Some(uri) = recorded
        .get("body")
        .and_then(|b| b.get("context_uri"))
        .and_then(|u| u.as_str())
    {
        *state.playing_context.lock().unwrap() = Some(uri.to_string());
    }
    state.play_requests.lock().unwrap().push(recorded);

    StatusCode::NO_CONTENT.into_response()
}

async fn pause(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.pause_calls.fetch_add(1, Ordering::SeqCst);
    *state.playing_context.lock().unwrap() = None;
    StatusCode::NO_CONTENT.into_response()
}

async fn no_content(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn genres(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"genres": ["acoustic", "jazz", "pop"]})).into_response()
}

async fn follow(
    State(state): State<Arc<MockState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.followed.lock().unwrap().push(id);
    StatusCode::OK.into_response()
}

async fn unfollow(
    State(state): State<Arc<MockState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.followed.lock().unwrap().retain(|f| f != &id);
    StatusCode::OK.into_response()
}

async fn follows(
    State(state): State<Arc<MockState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let asked_for_listener = params.get("ids").map(String::as_str) == Some("listener");
    let following = asked_for_listener && state.followed.lock().unwrap().contains(&id);
    Json(json!([following])).into_response()
}

async fn weather(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if state.garble_bodies.load(Ordering::SeqCst) {
        return garbled();
    }
    if state.fail_weather.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"cod": 503, "message": "Service unavailable"})),
        )
            .into_response();
    }
    if params.get("appid").map(String::as_str) != Some("weather-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"cod": 401, "message": "Invalid API key"})),
        )
            .into_response();
    }

    Json(json!({
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 22.5, "feels_like": 22.0, "humidity": 40},
        "timezone": -14400,
        "name": "New York"
    }))
    .into_response()
}

async fn sun(State(state): State<Arc<MockState>>) -> Response {
    if state.garble_bodies.load(Ordering::SeqCst) {
        return garbled();
    }
    if state.fail_sun.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"results": "", "status": "INVALID_REQUEST"})),
        )
            .into_response();
    }

    Json(json!({
        "results": {
            "sunrise": "2024-06-21T09:25:00+00:00",
            "sunset": "2024-06-22T00:31:00+00:00",
            "solar_noon": "2024-06-21T16:58:00+00:00",
            "day_length": 54360,
            "civil_twilight_begin": "2024-06-21T08:52:00+00:00",
            "civil_twilight_end": "2024-06-22T01:04:00+00:00"
        },
        "status": "OK"
    }))
    .into_response()
}
