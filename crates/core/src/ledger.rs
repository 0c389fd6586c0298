// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invalidation ledger
//!
//! A race keeps the punches an operator has explicitly rejected. Entries are
//! keyed by chip and the exact (rounded) timestamp, so a key addresses one
//! punch and is never reused for another.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key addressing one punch of one chip
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvalidationKey(String);

impl InvalidationKey {
    /// Build the key for a chip's punch at `time`.
    ///
    /// Format is `<chip>:<unix nanoseconds>`, with `time` read as UTC.
    pub fn new(chip: &str, time: NaiveDateTime) -> Self {
        let nanos = time.and_utc().timestamp_nanos_opt().unwrap_or_default();
        Self(format!("{}:{}", chip, nanos))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvalidationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Punches marked invalid for a race. Absence means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvalidationLedger {
    entries: BTreeMap<InvalidationKey, bool>,
}

impl InvalidationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a punch invalid and return its key
    pub fn mark(&mut self, chip: &str, time: NaiveDateTime) -> InvalidationKey {
        let key = InvalidationKey::new(chip, time);
        self.entries.insert(key.clone(), true);
        key
    }

    /// Remove a key; returns whether it was present
    pub fn unmark(&mut self, key: &InvalidationKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove the entry for a chip's punch at `time`
    pub fn unmark_punch(&mut self, chip: &str, time: NaiveDateTime) -> bool {
        self.unmark(&InvalidationKey::new(chip, time))
    }

    pub fn is_invalid(&self, chip: &str, time: NaiveDateTime) -> bool {
        self.contains(&InvalidationKey::new(chip, time))
    }

    /// Whether the key is present and marked invalid
    pub fn contains(&self, key: &InvalidationKey) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn keys(&self) -> impl Iterator<Item = &InvalidationKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
