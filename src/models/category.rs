// SPDX-License-Identifier: MIT

//! The closed set of WHOOP data categories tracked by the relay.
//!
//! Each category carries its own upstream endpoint paths, so the webhook
//! dispatcher and the cache-miss path share a single per-category fetch
//! policy instead of scattering URL strings around.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four data kinds the relay caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recovery,
    Sleep,
    Workout,
    Cycle,
}

impl Category {
    /// All categories, in the order the refresh sweep visits them.
    pub const ALL: [Category; 4] = [
        Category::Recovery,
        Category::Sleep,
        Category::Workout,
        Category::Cycle,
    ];

    /// Collection endpoint path, relative to the WHOOP API base URL.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Category::Recovery => "/recovery",
            Category::Sleep => "/activity/sleep",
            Category::Workout => "/activity/workout",
            Category::Cycle => "/cycle",
        }
    }

    /// Item endpoint path for a single record, where the API exposes one.
    ///
    /// Only sleep records are fetched by id (the id arrives in
    /// `sleep.updated` webhook events); the other categories are always
    /// read from their collection endpoints.
    pub fn item_path(&self, id: &str) -> Option<String> {
        match self {
            Category::Sleep => Some(format!("/activity/sleep/{}", id)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Recovery => "recovery",
            Category::Sleep => "sleep",
            Category::Workout => "workout",
            Category::Cycle => "cycle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recovery" => Ok(Category::Recovery),
            "sleep" => Ok(Category::Sleep),
            "workout" => Ok(Category::Workout),
            "cycle" => Ok(Category::Cycle),
            _ => Err(()),
        }
    }
}
