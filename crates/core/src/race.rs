// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race definition

use crate::ledger::InvalidationLedger;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A race: start time, registered chips and the punches rejected so far.
///
/// The name is unique and keys every per-race file and watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub name: String,
    /// Wall-clock start, in the timing device's local time
    pub start_time: NaiveDateTime,
    /// Shortest elapsed time a finish can have
    #[serde(with = "humantime_serde")]
    pub min_time: Duration,
    #[serde(default)]
    pub chips: BTreeSet<String>,
    /// Punch log written by the timing device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_file: Option<PathBuf>,
    #[serde(default)]
    pub invalid_times: InvalidationLedger,
    #[serde(default)]
    pub live_update: bool,
}

impl Race {
    pub fn new(name: impl Into<String>, start_time: NaiveDateTime, min_time: Duration) -> Self {
        Self {
            name: name.into(),
            start_time,
            min_time,
            chips: BTreeSet::new(),
            results_file: None,
            invalid_times: InvalidationLedger::new(),
            live_update: false,
        }
    }

    pub fn with_chips<I, S>(mut self, chips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chips.extend(chips.into_iter().map(Into::into));
        self
    }

    pub fn with_results_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_file = Some(path.into());
        self
    }

    pub fn is_registered(&self, chip: &str) -> bool {
        self.chips.contains(chip)
    }

    /// The punch file, if one is configured. An empty path counts as none.
    pub fn source_file(&self) -> Option<&Path> {
        self.results_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Time since the start; zero for instants at or before it
    pub fn elapsed(&self, time: NaiveDateTime) -> Duration {
        (time - self.start_time).to_std().unwrap_or_default()
    }

    /// A punch qualifies when it is after the start and meets the minimum time
    pub fn qualifies(&self, time: NaiveDateTime) -> bool {
        time > self.start_time && self.elapsed(time) >= self.min_time
    }
}

#[cfg(test)]
#[path = "race_tests.rs"]
mod tests;
