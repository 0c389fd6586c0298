// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timed results and manual entries

use crate::ledger::InvalidationKey;
use crate::race::Race;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// One chip's time in a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedResult {
    pub chip: String,
    pub time: NaiveDateTime,
    /// Elapsed since race start
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// Derived from the race ledger; stored values are recomputed on load
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub manual: bool,
}

impl TimedResult {
    /// Result for a device punch, with validity taken from the race ledger
    pub fn from_punch(race: &Race, chip: &str, time: NaiveDateTime) -> Self {
        Self {
            chip: chip.to_string(),
            time,
            duration: race.elapsed(time),
            invalid: race.invalid_times.is_invalid(chip, time),
            manual: false,
        }
    }

    /// Result for a manually entered time
    pub fn from_manual(race: &Race, entry: &ManualEntry) -> Self {
        Self {
            manual: true,
            ..Self::from_punch(race, &entry.chip, entry.time)
        }
    }

    pub fn key(&self) -> InvalidationKey {
        InvalidationKey::new(&self.chip, self.time)
    }

    /// Whether this result is the given chip's punch at `time`
    pub fn is_punch(&self, chip: &str, time: NaiveDateTime) -> bool {
        self.chip == chip && self.time == time
    }
}

/// A finish time typed in by an operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntry {
    pub chip: String,
    pub time: NaiveDateTime,
    pub race_name: String,
}

/// Stable sort by timestamp; equal times keep their order
pub fn sort_by_time(results: &mut [TimedResult]) {
    results.sort_by_key(|result| result.time);
}

/// Keep every invalid result plus the first valid one per chip.
///
/// Input order is preserved, so a time-sorted input stays sorted.
pub fn first_valid_per_chip(results: Vec<TimedResult>) -> Vec<TimedResult> {
    let mut timed: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|result| result.invalid || timed.insert(result.chip.clone()))
        .collect()
}

/// Re-derive invalid flags from the race ledger
pub fn refresh_validity(race: &Race, results: &mut [TimedResult]) {
    for result in results {
        result.invalid = race.invalid_times.is_invalid(&result.chip, result.time);
    }
}

/// Results whose chip contains `search`; an empty search keeps everything
pub fn filter_results(results: &[TimedResult], search: &str) -> Vec<TimedResult> {
    if search.is_empty() {
        return results.to_vec();
    }
    results
        .iter()
        .filter(|result| result.chip.contains(search))
        .cloned()
        .collect()
}

/// Format an elapsed time as `MM:SS`, or `HH:MM:SS` from one hour up
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
