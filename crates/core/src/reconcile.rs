// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result reconciliation
//!
//! Merges manual entries, device punches and the invalidation ledger into
//! one time-ordered result list per race. Manual entries take precedence:
//! a chip with a manual time gets no device results. Every pass rewrites
//! the race's result cache.

use crate::punch::{find_next_valid, parse_results};
use crate::race::Race;
use crate::result::{
    first_valid_per_chip, format_duration, refresh_validity, sort_by_time, ManualEntry,
    TimedResult,
};
use crate::storage::{JsonStore, ManualTimes, ResultCache, StorageError};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Non-fatal problem met while reconciling
#[derive(Debug, Error)]
pub enum ReconcileWarning {
    #[error("cannot read punch file {path}: {source}")]
    SourceUnreadable { path: PathBuf, source: io::Error },
    #[error("cannot load manual times for {race}: {source}")]
    ManualTimes { race: String, source: StorageError },
    #[error("cannot access result cache for {race}: {source}")]
    Cache { race: String, source: StorageError },
}

/// Errors returned to the caller of a result edit
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("no result for chip {chip} at {time}")]
    ResultNotFound { chip: String, time: NaiveDateTime },
    #[error("chip {chip} is not registered in race {race}")]
    UnregisteredChip { race: String, chip: String },
    #[error("time {} for chip {chip} is below the minimum {}", clock(.elapsed), clock(.min))]
    BelowMinimum {
        chip: String,
        elapsed: Duration,
        min: Duration,
    },
    #[error("elapsed time out of range")]
    OutOfRange,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn clock(duration: &Duration) -> String {
    format_duration(*duration)
}

/// Output of a reconciliation pass
#[derive(Debug, Default)]
pub struct Reconciliation {
    pub results: Vec<TimedResult>,
    pub warnings: Vec<ReconcileWarning>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Builds and edits a race's result list
#[derive(Debug, Clone)]
pub struct Reconciler {
    manual: ManualTimes,
    cache: ResultCache,
}

impl Reconciler {
    pub fn new(store: JsonStore) -> Self {
        Self {
            manual: ManualTimes::new(store.clone()),
            cache: ResultCache::new(store),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn manual_times(&self) -> &ManualTimes {
        &self.manual
    }

    /// Rebuild the race's results from its sources and refresh the cache
    pub fn reconcile(&self, race: &Race) -> Reconciliation {
        let mut warnings = Vec::new();

        let entries = match self.manual.load(&race.name) {
            Ok(entries) => entries,
            Err(source) => {
                tracing::warn!(race = %race.name, error = %source, "failed to load manual times");
                warnings.push(ReconcileWarning::ManualTimes {
                    race: race.name.clone(),
                    source,
                });
                Vec::new()
            }
        };
        let mut results: Vec<TimedResult> = entries
            .iter()
            .filter(|entry| entry.race_name == race.name)
            .map(|entry| TimedResult::from_manual(race, entry))
            .collect();
        let covered: HashSet<String> = results.iter().map(|r| r.chip.clone()).collect();

        match parse_results(race) {
            Ok(punched) => {
                results.extend(punched.into_iter().filter(|r| !covered.contains(&r.chip)));
            }
            Err(source) => {
                let path = race.source_file().map(PathBuf::from).unwrap_or_default();
                tracing::warn!(
                    race = %race.name,
                    path = %path.display(),
                    error = %source,
                    "failed to read punch file"
                );
                warnings.push(ReconcileWarning::SourceUnreadable { path, source });
            }
        }

        sort_by_time(&mut results);
        let results = first_valid_per_chip(results);
        tracing::debug!(race = %race.name, count = results.len(), "reconciled results");

        self.persist(race, &results, &mut warnings);
        Reconciliation { results, warnings }
    }

    /// The cached result list, or a fresh reconciliation when none is cached
    pub fn snapshot(&self, race: &Race) -> Reconciliation {
        match self.cache.load(race) {
            Ok(Some(results)) => Reconciliation {
                results,
                warnings: Vec::new(),
            },
            Ok(None) => self.reconcile(race),
            Err(source) => {
                tracing::warn!(race = %race.name, error = %source, "discarding unreadable result cache");
                let mut reconciliation = self.reconcile(race);
                reconciliation.warnings.insert(
                    0,
                    ReconcileWarning::Cache {
                        race: race.name.clone(),
                        source,
                    },
                );
                reconciliation
            }
        }
    }

    /// Flip the validity of one result.
    ///
    /// Invalidating a device punch surfaces the chip's next valid punch from
    /// the raw log. Revalidating discards the chip's later results along with
    /// their ledger entries. The caller persists the race.
    pub fn toggle_invalid(
        &self,
        race: &mut Race,
        chip: &str,
        time: NaiveDateTime,
    ) -> Result<Reconciliation, ReconcileError> {
        let Reconciliation {
            mut results,
            mut warnings,
        } = self.snapshot(race);

        let target = results
            .iter()
            .find(|r| r.is_punch(chip, time))
            .cloned()
            .ok_or_else(|| ReconcileError::ResultNotFound {
                chip: chip.to_string(),
                time,
            })?;

        if target.invalid {
            race.invalid_times.unmark_punch(chip, time);
            let (discarded, kept): (Vec<_>, Vec<_>) = results
                .into_iter()
                .partition(|r| r.chip == chip && r.time > time);
            for later in &discarded {
                race.invalid_times.unmark(&later.key());
            }
            results = kept;
            tracing::info!(
                race = %race.name,
                chip,
                %time,
                discarded = discarded.len(),
                "result revalidated"
            );
        } else {
            race.invalid_times.mark(chip, time);
            let next = if target.manual {
                None
            } else {
                find_next_valid(race, chip, time)
            };
            if let Some(next) = next {
                if !results.iter().any(|r| r.is_punch(chip, next)) {
                    results.push(TimedResult::from_punch(race, chip, next));
                    sort_by_time(&mut results);
                }
            }
            tracing::info!(
                race = %race.name,
                chip,
                %time,
                next = ?next,
                "result invalidated"
            );
        }

        refresh_validity(race, &mut results);
        self.persist(race, &results, &mut warnings);
        Ok(Reconciliation { results, warnings })
    }

    /// Record a manual finish `elapsed` after the start.
    ///
    /// Every other result of the chip is marked invalid so the manual time
    /// becomes the chip's valid result. The caller persists the race.
    pub fn add_manual_time(
        &self,
        race: &mut Race,
        chip: &str,
        elapsed: Duration,
    ) -> Result<Reconciliation, ReconcileError> {
        if !race.is_registered(chip) {
            return Err(ReconcileError::UnregisteredChip {
                race: race.name.clone(),
                chip: chip.to_string(),
            });
        }
        if elapsed < race.min_time {
            return Err(ReconcileError::BelowMinimum {
                chip: chip.to_string(),
                elapsed,
                min: race.min_time,
            });
        }
        let time = TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| race.start_time.checked_add_signed(delta))
            .ok_or(ReconcileError::OutOfRange)?;

        let mut entries = self.manual.load(&race.name)?;
        entries.push(ManualEntry {
            chip: chip.to_string(),
            time,
            race_name: race.name.clone(),
        });
        self.manual.save(&race.name, &entries)?;

        let current = self.snapshot(race);
        for result in current.results.iter().filter(|r| r.chip == chip && r.time != time) {
            race.invalid_times.mark(chip, result.time);
        }
        tracing::info!(race = %race.name, chip, %time, "manual time added");

        Ok(self.reconcile(race))
    }

    fn persist(&self, race: &Race, results: &[TimedResult], warnings: &mut Vec<ReconcileWarning>) {
        if let Err(source) = self.cache.store(&race.name, results) {
            tracing::warn!(race = %race.name, error = %source, "failed to write result cache");
            warnings.push(ReconcileWarning::Cache {
                race: race.name.clone(),
                source,
            });
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
