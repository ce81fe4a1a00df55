// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("WHOOP API error: {0}")]
    WhoopApi(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            // Exact body WHOOP's webhook sender sees on a rejected delivery
            AppError::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::WhoopApi(msg) => (StatusCode::BAD_GATEWAY, "whoop_error", Some(msg.clone())),
            AppError::TokenRefresh(msg) => {
                tracing::error!(error = %msg, "Token refresh error");
                (StatusCode::BAD_GATEWAY, "token_refresh_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
