// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod signature;
pub mod whoop;

pub use whoop::{TokenStore, WhoopService};
