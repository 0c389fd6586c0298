// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Punch log parsing
//!
//! The timing device appends one tab-separated line per punch:
//! `<chip>\t<YYYY-MM-DD HH:MM:SS.mmm>`. Extra fields are ignored and
//! malformed lines are skipped. Every timestamp is rounded up to a whole
//! second before it is compared or stored.

use crate::race::Race;
use crate::result::{first_valid_per_chip, sort_by_time, TimedResult};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Timestamp layout of the punch log. Any fraction length is accepted.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One raw record from the timing device, already rounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punch {
    pub chip: String,
    pub time: NaiveDateTime,
}

/// Round up to the next whole second; whole seconds are unchanged
pub fn round_up_to_second(time: NaiveDateTime) -> NaiveDateTime {
    if time.nanosecond() == 0 {
        return time;
    }
    time.with_nanosecond(0)
        .map(|truncated| truncated + TimeDelta::seconds(1))
        .unwrap_or(time)
}

/// Parse one log line; `None` for short lines or bad timestamps
pub fn parse_line(line: &str) -> Option<Punch> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split('\t');
    let chip = fields.next()?;
    let stamp = fields.next()?;
    let time = NaiveDateTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT).ok()?;
    Some(Punch {
        chip: chip.to_string(),
        time: round_up_to_second(time),
    })
}

/// Reads raw punches from a timing device log
#[derive(Debug, Clone)]
pub struct PunchReader {
    path: PathBuf,
}

impl PunchReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every well-formed punch, in file order
    pub fn read(&self) -> io::Result<Vec<Punch>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut punches = Vec::new();
        let mut skipped = 0usize;

        // Devices do not always write UTF-8; decode lossily per line
        for line in reader.split(b'\n') {
            let line = String::from_utf8_lossy(&line?).into_owned();
            match parse_line(&line) {
                Some(punch) => punches.push(punch),
                None if line.trim().is_empty() => {}
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(
                path = %self.path.display(),
                skipped,
                "skipped malformed punch lines"
            );
        }
        Ok(punches)
    }
}

/// Qualifying punches of registered chips, in input order
pub fn qualifying_results(race: &Race, punches: &[Punch]) -> Vec<TimedResult> {
    punches
        .iter()
        .filter(|punch| race.is_registered(&punch.chip) && race.qualifies(punch.time))
        .map(|punch| TimedResult::from_punch(race, &punch.chip, punch.time))
        .collect()
}

/// Results from the race's punch file.
///
/// Per chip this is the earliest valid qualifying punch, preceded or
/// followed by any punches the ledger marks invalid. A race without a punch
/// file has no device results.
pub fn parse_results(race: &Race) -> io::Result<Vec<TimedResult>> {
    let Some(path) = race.source_file() else {
        return Ok(Vec::new());
    };
    let punches = PunchReader::new(path).read()?;
    let mut results = qualifying_results(race, &punches);
    sort_by_time(&mut results);
    Ok(first_valid_per_chip(results))
}

/// Earliest punch of `chip` after `after` that qualifies and is not invalid.
///
/// Reads the raw log rather than the per-chip view. A missing or
/// unreadable file yields `None`.
pub fn find_next_valid(race: &Race, chip: &str, after: NaiveDateTime) -> Option<NaiveDateTime> {
    let path = race.source_file()?;
    let punches = match PunchReader::new(path).read() {
        Ok(punches) => punches,
        Err(e) => {
            tracing::warn!(
                race = %race.name,
                path = %path.display(),
                error = %e,
                "cannot search punch file for next valid time"
            );
            return None;
        }
    };

    punches
        .into_iter()
        .filter(|punch| punch.chip == chip && punch.time > after)
        .filter(|punch| race.qualifies(punch.time))
        .filter(|punch| !race.invalid_times.is_invalid(chip, punch.time))
        .map(|punch| punch.time)
        .min()
}

#[cfg(test)]
#[path = "punch_tests.rs"]
mod tests;
