//! Application configuration loaded from environment variables.
//!
//! Credentials are read once at startup; the process refuses to start if
//! any of them is missing. The mutable token pair moves into the
//! `TokenStore` after loading and is never read from the environment again.

use std::env;

/// Production WHOOP developer API base URL.
const DEFAULT_API_BASE_URL: &str = "https://api.prod.whoop.com/developer/v2";
/// Production WHOOP OAuth token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// WHOOP OAuth client ID
    pub whoop_client_id: String,
    /// WHOOP OAuth client secret (also keys webhook signature verification)
    pub whoop_client_secret: String,
    /// Initial access token, obtained out of band
    pub whoop_access_token: String,
    /// Initial refresh token, obtained out of band
    pub whoop_refresh_token: String,
    /// WHOOP API base URL (overridable for tests)
    pub whoop_api_base_url: String,
    /// WHOOP OAuth token URL (overridable for tests)
    pub whoop_token_url: String,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Directory the bundled dashboard is served from
    pub static_dir: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The four WHOOP credential variables are required; everything else
    /// has a sensible default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            whoop_client_id: env::var("WHOOP_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_ID"))?,
            whoop_client_secret: env::var("WHOOP_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_SECRET"))?,
            whoop_access_token: env::var("WHOOP_ACCESS_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WHOOP_ACCESS_TOKEN"))?,
            whoop_refresh_token: env::var("WHOOP_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WHOOP_REFRESH_TOKEN"))?,
            whoop_api_base_url: env::var("WHOOP_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            whoop_token_url: env::var("WHOOP_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            whoop_client_id: "test_client_id".to_string(),
            whoop_client_secret: "test_secret".to_string(),
            whoop_access_token: "test_access_token".to_string(),
            whoop_refresh_token: "test_refresh_token".to_string(),
            whoop_api_base_url: "http://127.0.0.1:0".to_string(),
            whoop_token_url: "http://127.0.0.1:0/token".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            static_dir: "static".to_string(),
            port: 5001,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
