// SPDX-License-Identifier: MIT

//! Webhook route for WHOOP push notifications.
//!
//! Signature validation gates everything; after that, delivery must never
//! see a failure caused by the upstream API, so fetch errors are logged
//! and the sender still gets a 200.

use crate::error::AppError;
use crate::models::Category;
use crate::services::signature;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const TIMESTAMP_HEADER: &str = "X-WHOOP-Signature-Timestamp";
const SIGNATURE_HEADER: &str = "X-WHOOP-Signature";

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", post(handle_event))
}

/// WHOOP webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    user_id: Option<u64>,
    /// Record id; a number for v1-style events, a UUID string for v2.
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    trace_id: Option<String>,
}

impl WebhookEvent {
    /// Record id normalized to the string form used in item endpoint paths.
    fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Handle an incoming webhook delivery (POST).
///
/// The body is taken as raw bytes because the signature covers the exact
/// bytes received; JSON parsing happens only after verification.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());
    let candidate = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    // Missing headers count as an invalid signature
    let valid = match (timestamp, candidate) {
        (Some(timestamp), Some(candidate)) => signature::verify(
            timestamp,
            &body,
            candidate,
            &state.config.whoop_client_secret,
        ),
        _ => false,
    };

    if !valid {
        tracing::warn!("Webhook rejected: invalid signature");
        return AppError::InvalidSignature.into_response();
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return accepted();
        }
    };

    tracing::info!(
        event_type = %event.event_type,
        user_id = event.user_id,
        id = ?event.id,
        trace_id = event.trace_id.as_deref(),
        "Webhook event received"
    );

    let category = match event.event_type.as_str() {
        "sleep.updated" => Category::Sleep,
        "recovery.updated" => Category::Recovery,
        "workout.updated" => Category::Workout,
        other => {
            // WHOOP may add event types; acknowledge so it never sees a failure
            tracing::debug!(event_type = %other, "Ignoring unhandled event type");
            return accepted();
        }
    };

    let id = event.id_string();
    match state.whoop.fetch_record(category, id.as_deref()).await {
        Ok(Some(record)) => {
            state.cache.insert(category, record);
            tracing::info!(category = %category, "Cache updated from webhook");
        }
        Ok(None) => {
            tracing::warn!(category = %category, "No records returned, cache left unchanged");
        }
        Err(e) => {
            // Never surfaced to the sender; the delivery is still acknowledged
            tracing::error!(error = %e, category = %category, "Fetch failed, cache left unchanged");
        }
    }

    accepted()
}

fn accepted() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}
