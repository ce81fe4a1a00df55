// SPDX-License-Identifier: MIT

//! WHOOP API client with shared token lifecycle.
//!
//! Handles:
//! - Authenticated GETs against the developer API
//! - Lazy token refresh: refresh only after the API answers 401, then
//!   retry the request exactly once
//! - Coalescing concurrent refreshes into a single upstream call

use crate::cache::DataCache;
use crate::config::Config;
use crate::error::AppError;
use crate::models::Category;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The mutable OAuth token pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Process-wide credential store, shared across all request handlers.
///
/// Readers snapshot the current token; the writer replaces it whole, so a
/// handler never observes a half-updated token.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<RwLock<Credentials>>,
}

impl TokenStore {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Credentials {
                access_token,
                refresh_token,
            })),
        }
    }

    pub fn access_token(&self) -> String {
        self.inner.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> String {
        self.inner.read().refresh_token.clone()
    }

    /// Replace the access token, and the refresh token when the provider
    /// rotated it. Both are written under one lock acquisition.
    pub fn update(&self, access_token: String, refresh_token: Option<String>) {
        let mut credentials = self.inner.write();
        credentials.access_token = access_token;
        if let Some(refresh_token) = refresh_token {
            credentials.refresh_token = refresh_token;
        }
    }
}

/// Token refresh response from the WHOOP OAuth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    /// Present when the provider rotates refresh tokens on refresh.
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Collection endpoints wrap records in a `records` array, newest first.
#[derive(Debug, Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

/// Low-level WHOOP HTTP transport.
#[derive(Clone)]
struct WhoopClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl WhoopClient {
    fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.whoop_api_base_url.clone(),
            token_url: config.whoop_token_url.clone(),
            client_id: config.whoop_client_id.clone(),
            client_secret: config.whoop_client_secret.clone(),
        }
    }

    /// Single GET with a bearer token, no retry policy.
    async fn get(&self, path: &str, access_token: &str) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::WhoopApi(e.to_string()))
    }

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenRefresh(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenRefresh(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::TokenRefresh(format!("JSON parse error: {}", e)))
    }
}

/// High-level WHOOP service wrapping the transport with token management.
///
/// One instance (cheaply cloneable) is shared by the webhook dispatcher,
/// the cache-miss read path, and the manual refresh sweep.
#[derive(Clone)]
pub struct WhoopService {
    client: WhoopClient,
    tokens: TokenStore,
    /// Serializes token refreshes so concurrent 401s trigger one upstream call.
    refresh_lock: Arc<Mutex<()>>,
}

impl WhoopService {
    pub fn new(config: &Config, tokens: TokenStore) -> Self {
        Self {
            client: WhoopClient::new(config),
            tokens,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Authenticated GET with the retry-once-on-401 policy.
    ///
    /// The bearer token is read fresh from the store at call time. On a 401
    /// the token is refreshed and the request retried exactly once with the
    /// new token; if the refresh fails, the original 401 response is
    /// returned to the caller. Other error classes propagate unretried.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, AppError> {
        let token = self.tokens.access_token();
        let response = self.client.get(path, &token).await?;

        if response.status() != reqwest::StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::warn!(path, "WHOOP returned 401, refreshing access token");
        match self.refresh_access_token(&token).await {
            Ok(new_token) => self.client.get(path, &new_token).await,
            Err(e) => {
                tracing::error!(error = %e, "Token refresh failed, keeping original 401");
                Ok(response)
            }
        }
    }

    /// Refresh the shared access token, coalescing concurrent attempts.
    ///
    /// `stale_token` is the token that just earned a 401. If the store holds
    /// a different token once the refresh lock is acquired, another handler
    /// already refreshed and no upstream call is made.
    async fn refresh_access_token(&self, stale_token: &str) -> Result<String, AppError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.tokens.access_token();
        if current != stale_token {
            return Ok(current);
        }

        let refresh_token = self.tokens.refresh_token();
        let new_tokens = self.client.refresh_token(&refresh_token).await?;

        if new_tokens.refresh_token.is_some() {
            tracing::info!("Provider rotated the refresh token, capturing it");
        }
        self.tokens
            .update(new_tokens.access_token.clone(), new_tokens.refresh_token);

        tracing::info!("Access token refreshed");
        Ok(new_tokens.access_token)
    }

    /// Fetch the most recent record for a category from its collection
    /// endpoint. `Ok(None)` means the collection is empty.
    pub async fn fetch_latest(
        &self,
        category: Category,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let response = self.get(category.collection_path()).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WhoopApi(format!("HTTP {}: {}", status, body)));
        }

        let collection: CollectionResponse = response
            .json()
            .await
            .map_err(|e| AppError::WhoopApi(format!("JSON parse error: {}", e)))?;

        Ok(collection.records.into_iter().next())
    }

    /// Fetch the record a webhook event refers to.
    ///
    /// Categories with an item endpoint (sleep) are fetched by the event id;
    /// the rest fall back to the newest record of their collection.
    pub async fn fetch_record(
        &self,
        category: Category,
        id: Option<&str>,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let Some(path) = id.and_then(|id| category.item_path(id)) else {
            return self.fetch_latest(category).await;
        };

        let response = self.get(&path).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WhoopApi(format!("HTTP {}: {}", status, body)));
        }

        let record = response
            .json()
            .await
            .map_err(|e| AppError::WhoopApi(format!("JSON parse error: {}", e)))?;

        Ok(Some(record))
    }

    /// Fetch all four categories and overwrite the cache entries that
    /// yielded a record; empty collections leave their entry untouched.
    ///
    /// Fetch errors abort the sweep, so a partial update is possible. Used
    /// by `POST /api/refresh`.
    pub async fn refresh_all(&self, cache: &DataCache) -> Result<(), AppError> {
        for category in Category::ALL {
            match self.fetch_latest(category).await? {
                Some(record) => {
                    cache.insert(category, record);
                    tracing::info!(category = %category, "Cache updated");
                }
                None => {
                    tracing::warn!(category = %category, "No records returned, cache left unchanged");
                }
            }
        }
        Ok(())
    }
}
