// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chiptime-core: Core library for the chiptime race timing tool
//!
//! This crate provides:
//! - Race, result and manual-entry data types
//! - Punch log parsing with second rounding and qualification
//! - The invalidation ledger and result reconciliation
//! - JSON-based storage for races, manual times and cached results
//! - Race events for loose coupling with the presentation layer

pub mod config;
pub mod events;
pub mod ledger;
pub mod punch;
pub mod race;
pub mod reconcile;
pub mod result;
pub mod storage;

// Re-exports
pub use config::{Config, ConfigError};
pub use events::{
    EventBus, EventPattern, EventReceiver, Notifier, RaceEvent, SubscriberId, Subscription,
};
pub use ledger::{InvalidationKey, InvalidationLedger};
pub use punch::{Punch, PunchReader};
pub use race::Race;
pub use reconcile::{ReconcileError, ReconcileWarning, Reconciler, Reconciliation};
pub use result::{filter_results, format_duration, ManualEntry, TimedResult};
pub use storage::{JsonStore, ManualTimes, ResultCache, StorageError};
