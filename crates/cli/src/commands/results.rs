// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result commands: show, report, invalidate and manual times

use crate::output::{print_results, print_warnings, report, OutputFormat};
use crate::parse::{parse_clock, parse_result_time};
use anyhow::Result;
use chiptime_core::filter_results;
use chiptime_engine::RaceService;

/// Show a race's results, filtered by chip
pub fn show(
    service: &RaceService,
    race: &str,
    search: Option<&str>,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    let reconciliation = if refresh {
        service.reconcile(race)?
    } else {
        service.results(race)?
    };
    print_warnings(&reconciliation.warnings);
    let results = filter_results(&reconciliation.results, search.unwrap_or_default());
    print_results(&results, format);
    Ok(())
}

/// Print the plain-text report of valid results
pub fn show_report(service: &RaceService, race: &str) -> Result<()> {
    let details = service.race(race)?;
    let reconciliation = service.results(race)?;
    print_warnings(&reconciliation.warnings);
    print!("{}", report(&details, &reconciliation.results));
    Ok(())
}

pub fn toggle(
    service: &RaceService,
    race: &str,
    chip: &str,
    time: &str,
    format: OutputFormat,
) -> Result<()> {
    let start = service.race(race)?.start_time;
    let time = parse_result_time(start, time)?;
    let reconciliation = service.toggle_invalid(race, chip, time)?;
    print_warnings(&reconciliation.warnings);
    print_results(&reconciliation.results, format);
    Ok(())
}

pub fn add_time(
    service: &RaceService,
    race: &str,
    chip: &str,
    elapsed: &str,
    format: OutputFormat,
) -> Result<()> {
    let elapsed = parse_clock(elapsed)?;
    let reconciliation = service.add_manual_time(race, chip, elapsed)?;
    print_warnings(&reconciliation.warnings);
    print_results(&reconciliation.results, format);
    Ok(())
}
