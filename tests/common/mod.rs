// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use httpmock::MockServer;
use sha2::Sha256;
use std::sync::Arc;
use whoop_relay::{
    cache::DataCache,
    config::Config,
    routes::create_router,
    services::{TokenStore, WhoopService},
    AppState,
};

/// Matches `Config::test_default()`.
pub const TEST_SECRET: &str = "test_secret";
pub const TEST_ACCESS_TOKEN: &str = "test_access_token";

/// Test config pointed at a mock WHOOP server.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::test_default();
    config.whoop_api_base_url = server.base_url();
    config.whoop_token_url = server.url("/oauth/oauth2/token");
    config
}

/// Build the full router plus a handle on its cache.
pub fn test_app(config: Config) -> (axum::Router, DataCache) {
    let tokens = TokenStore::new(
        config.whoop_access_token.clone(),
        config.whoop_refresh_token.clone(),
    );
    let whoop = WhoopService::new(&config, tokens);
    let cache = DataCache::new();

    let state = Arc::new(AppState {
        config,
        cache: cache.clone(),
        whoop,
    });

    (create_router(state), cache)
}

/// Compute a webhook signature the way WHOOP does:
/// base64(HMAC-SHA256(secret, timestamp + raw body)).
pub fn sign(secret: &str, timestamp: &str, body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.as_bytes());
    mac.update(body.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Build a signed POST /webhook request.
pub fn webhook_request(
    body: &str,
    timestamp: &str,
    signature: &str,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("X-WHOOP-Signature-Timestamp", timestamp)
        .header("X-WHOOP-Signature", signature)
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

/// Build a plain GET request.
pub fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
