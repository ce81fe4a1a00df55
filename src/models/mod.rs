// SPDX-License-Identifier: MIT

//! Data models for the relay.

pub mod category;

pub use category::Category;
