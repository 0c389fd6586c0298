// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last reconciled result list per race

use super::json::{JsonStore, StorageError};
use crate::race::Race;
use crate::result::{refresh_validity, TimedResult};
use std::path::PathBuf;

const KIND: &str = "results";

/// Snapshot of a race's reconciled results.
///
/// The snapshot is derived data: deleting it only forces the next read to
/// reconcile again.
#[derive(Debug, Clone)]
pub struct ResultCache {
    store: JsonStore,
}

impl ResultCache {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Cached results with invalid flags re-derived from the race ledger
    pub fn load(&self, race: &Race) -> Result<Option<Vec<TimedResult>>, StorageError> {
        let Some(mut results) = self.store.load::<Vec<TimedResult>>(KIND, &race.name)? else {
            return Ok(None);
        };
        refresh_validity(race, &mut results);
        Ok(Some(results))
    }

    /// Replace the snapshot
    pub fn store(&self, race: &str, results: &[TimedResult]) -> Result<(), StorageError> {
        self.store.save(KIND, race, results)
    }

    /// Delete the snapshot; a missing snapshot is fine
    pub fn invalidate(&self, race: &str) -> Result<(), StorageError> {
        self.store.delete(KIND, race)
    }

    pub fn path(&self, race: &str) -> PathBuf {
        self.store.path_for(KIND, race)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
