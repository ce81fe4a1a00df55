// SPDX-License-Identifier: MIT

//! In-memory cache of the last known record per data category.

use crate::models::Category;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Last-known-good record per category, shared across request handlers.
///
/// Records are opaque JSON documents from the WHOOP API, stored verbatim
/// and overwritten whole. A reader never observes a partial record. There
/// is no TTL: staleness is bounded by webhook delivery and manual refresh,
/// not by time.
#[derive(Clone, Default)]
pub struct DataCache {
    inner: Arc<DashMap<Category, Value>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached record for a category, if one has been stored.
    pub fn get(&self, category: Category) -> Option<Value> {
        self.inner.get(&category).map(|entry| entry.value().clone())
    }

    /// Replace the cached record for a category (last write wins).
    pub fn insert(&self, category: Category, record: Value) {
        self.inner.insert(category, record);
    }
}
