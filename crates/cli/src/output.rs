// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use chiptime_core::{format_duration, Race, ReconcileWarning, TimedResult};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

/// One line of `race list`
#[derive(Serialize)]
pub struct RaceInfo {
    pub name: String,
    pub start: String,
    pub min_time: String,
    pub chips: usize,
    pub live_update: bool,
}

impl RaceInfo {
    pub const HEADER: &'static str = "NAME                 START             MIN     CHIPS  LIVE";

    pub fn new(race: &Race) -> Self {
        Self {
            name: race.name.clone(),
            start: race.start_time.format("%Y-%m-%d %H:%M").to_string(),
            min_time: format_duration(race.min_time),
            chips: race.chips.len(),
            live_update: race.live_update,
        }
    }
}

impl fmt::Display for RaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<17} {:<7} {:>5}  {}",
            self.name,
            self.start,
            self.min_time,
            self.chips,
            if self.live_update { "yes" } else { "no" }
        )
    }
}

/// Text line for one result
pub struct ResultRow<'a>(pub &'a TimedResult);

impl ResultRow<'_> {
    pub const HEADER: &'static str = "CHIP       TIME      PUNCH     STATUS";
}

impl fmt::Display for ResultRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let status = if result.invalid { "INVALID" } else { "OK" };
        write!(
            f,
            "{:<10} {:<9} {:<9} {}",
            result.chip,
            format_duration(result.duration),
            result.time.format("%H:%M:%S"),
            status
        )?;
        if result.manual {
            write!(f, " (manual)")?;
        }
        Ok(())
    }
}

/// Print results as a table or JSON
pub fn print_results(results: &[TimedResult], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No results");
                return;
            }
            println!("{}", ResultRow::HEADER);
            for result in results {
                println!("{}", ResultRow(result));
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(results) {
                println!("{}", json);
            }
        }
    }
}

/// Plain-text report of a race's valid results
pub fn report(race: &Race, results: &[TimedResult]) -> String {
    let min = race.min_time.as_secs();
    let mut out = String::new();
    out.push_str(&format!("Results for {}\n", race.name));
    out.push_str(&format!("Started: {}\n", race.start_time.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!("Minimum time: {}:{:02}\n\n", min / 60, min % 60));
    out.push_str("Chip\tTime\n");
    out.push_str("--------------------\n");
    for result in results.iter().filter(|result| !result.invalid) {
        out.push_str(&format!("{}\t{}\n", result.chip, format_duration(result.duration)));
    }
    out
}

/// Reconciliation warnings go to stderr
pub fn print_warnings(warnings: &[ReconcileWarning]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
