// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage module for JSON-based persistence

mod cache;
pub mod json;
mod manual;

pub use cache::ResultCache;
pub use json::{JsonStore, StorageError};
pub use manual::ManualTimes;
