// SPDX-License-Identifier: MIT

//! API routes serving cached WHOOP data to the frontend.

use crate::error::{AppError, Result};
use crate::models::Category;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/refresh", post(refresh_all))
        .route("/api/{category}", get(get_category))
}

/// Get the latest record for a category, fetching from WHOOP on a miss.
///
/// Always answers 200: a record when one is known, `{}` when the cache is
/// empty and the upstream fetch fails or yields nothing.
async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Value>> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown category: {}", category)))?;

    if let Some(record) = state.cache.get(category) {
        return Ok(Json(record));
    }

    // Cache miss: same collection fetch the webhook dispatcher uses
    match state.whoop.fetch_latest(category).await {
        Ok(Some(record)) => {
            state.cache.insert(category, record.clone());
            tracing::info!(category = %category, "Cache populated on miss");
            Ok(Json(record))
        }
        Ok(None) => Ok(Json(json!({}))),
        Err(e) => {
            tracing::error!(error = %e, category = %category, "Fetch on cache miss failed");
            Ok(Json(json!({})))
        }
    }
}

/// Force a fetch of all four categories.
async fn refresh_all(State(state): State<Arc<AppState>>) -> Response {
    match state.whoop.refresh_all(&state.cache).await {
        Ok(()) => Json(json!({
            "status": "success",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Manual refresh failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": e.to_string()})),
            )
                .into_response()
        }
    }
}
