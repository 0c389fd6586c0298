// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manually entered finish times, one list per race

use super::json::{JsonStore, StorageError};
use crate::result::ManualEntry;

const KIND: &str = "manual_times";

/// Read and overwrite a race's manual-time list
#[derive(Debug, Clone)]
pub struct ManualTimes {
    store: JsonStore,
}

impl ManualTimes {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Entries in arrival order; empty when the race has none yet
    pub fn load(&self, race: &str) -> Result<Vec<ManualEntry>, StorageError> {
        Ok(self.store.load(KIND, race)?.unwrap_or_default())
    }

    /// Replace the whole list
    pub fn save(&self, race: &str, entries: &[ManualEntry]) -> Result<(), StorageError> {
        self.store.save(KIND, race, entries)
    }

    /// Move a race's list to a new race name, rewriting each entry's race.
    ///
    /// The new list is written before the old one is removed.
    pub fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let Some(mut entries) = self.store.load::<Vec<ManualEntry>>(KIND, from)? else {
            return Ok(());
        };
        for entry in entries.iter_mut().filter(|entry| entry.race_name == from) {
            entry.race_name = to.to_string();
        }
        self.save(to, &entries)?;
        self.remove(from)
    }

    /// Drop the race's list entirely
    pub fn remove(&self, race: &str) -> Result<(), StorageError> {
        self.store.delete(KIND, race)
    }
}

#[cfg(test)]
#[path = "manual_tests.rs"]
mod tests;
