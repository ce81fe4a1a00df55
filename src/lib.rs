// SPDX-License-Identifier: MIT

//! WHOOP Relay: push WHOOP wearable data to a local dashboard.
//!
//! This crate receives signed WHOOP webhook events, re-fetches the
//! affected data from the WHOOP API (keeping the shared OAuth token pair
//! fresh), and serves the last known record per category to the frontend.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use cache::DataCache;
use config::Config;
use services::WhoopService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub cache: DataCache,
    pub whoop: WhoopService,
}
