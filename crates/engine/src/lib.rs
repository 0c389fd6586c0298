// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chiptime live engine: file watchers, the shared view registry and the
//! race service that ties them to reconciliation

mod error;
pub mod registry;
mod service;
pub mod source;
pub mod watcher;

pub use error::{LiveError, ServiceError};
pub use registry::{Registry, Stop, ViewState};
pub use service::{RaceEdit, RaceService, ViewRegistry};
pub use source::{ChangeSource, FileSource};
pub use watcher::{LiveState, LiveWatcher, Observation, Step, WatcherHandle, DEFAULT_POLL_INTERVAL};
