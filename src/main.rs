// SPDX-License-Identifier: MIT

//! WHOOP Relay server
//!
//! Relays WHOOP wearable data (recovery, sleep, workout, daily cycle) to a
//! local frontend, driven by webhook push notifications and manual refresh.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whoop_relay::{
    cache::DataCache,
    config::Config,
    models::Category,
    services::{TokenStore, WhoopService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Missing credentials abort startup
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting WHOOP Relay");

    let tokens = TokenStore::new(
        config.whoop_access_token.clone(),
        config.whoop_refresh_token.clone(),
    );
    let whoop = WhoopService::new(&config, tokens);
    let cache = DataCache::new();

    // Best-effort initial fetch so the dashboard has data right away
    fetch_initial_data(&whoop, &cache).await;

    let state = Arc::new(AppState {
        config: config.clone(),
        cache,
        whoop,
    });

    let app = whoop_relay::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Listening for webhooks");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Populate the cache for every category before serving. Failures are
/// logged per category and never prevent startup.
async fn fetch_initial_data(whoop: &WhoopService, cache: &DataCache) {
    tracing::info!("Fetching initial WHOOP data");
    for category in Category::ALL {
        match whoop.fetch_latest(category).await {
            Ok(Some(record)) => {
                cache.insert(category, record);
                tracing::info!(category = %category, "Initial data loaded");
            }
            Ok(None) => {
                tracing::warn!(category = %category, "No records found");
            }
            Err(e) => {
                tracing::error!(category = %category, error = %e, "Initial fetch failed");
            }
        }
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("whoop_relay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
