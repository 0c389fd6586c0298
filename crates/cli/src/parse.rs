// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of times and chip lists typed on the command line

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, TimeDelta};
use std::path::Path;
use std::time::Duration;

/// Race start, to the minute
pub const START_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Absolute punch time
pub const PUNCH_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_start(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), START_FORMAT)
        .with_context(|| format!("invalid start time '{}', expected YYYY-MM-DD HH:MM", text))
}

/// `MM:SS`; minutes may exceed 59
pub fn parse_min_time(text: &str) -> Result<Duration> {
    let fields = split_fields(text)?;
    let [minutes, seconds] = fields.as_slice() else {
        bail!("invalid minimum time '{}', expected MM:SS", text);
    };
    if *seconds >= 60 {
        bail!("invalid minimum time '{}', seconds must be below 60", text);
    }
    Ok(Duration::from_secs(minutes * 60 + seconds))
}

/// `HH:MM:SS` elapsed since the start
pub fn parse_clock(text: &str) -> Result<Duration> {
    let fields = split_fields(text)?;
    let [hours, minutes, seconds] = fields.as_slice() else {
        bail!("invalid time '{}', expected HH:MM:SS", text);
    };
    if *minutes >= 60 || *seconds >= 60 {
        bail!("invalid time '{}', minutes and seconds must be below 60", text);
    }
    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

/// A result's punch time: either absolute or `HH:MM:SS` after `start`
pub fn parse_result_time(start: NaiveDateTime, text: &str) -> Result<NaiveDateTime> {
    if let Ok(time) = NaiveDateTime::parse_from_str(text.trim(), PUNCH_FORMAT) {
        return Ok(time);
    }
    let elapsed = parse_clock(text)
        .with_context(|| format!("expected HH:MM:SS or YYYY-MM-DD HH:MM:SS, got '{}'", text))?;
    TimeDelta::from_std(elapsed)
        .ok()
        .and_then(|delta| start.checked_add_signed(delta))
        .context("time out of range")
}

/// Chips from `--chips` values and an optional file with one chip per line
pub fn parse_chips(values: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut chips: Vec<String> = values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|chip| !chip.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read chips file {}", path.display()))?;
        chips.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|chip| !chip.is_empty())
                .map(str::to_string),
        );
    }
    Ok(chips)
}

fn split_fields(text: &str) -> Result<Vec<u64>> {
    text.trim()
        .split(':')
        .map(|field| {
            field
                .parse::<u64>()
                .with_context(|| format!("invalid number '{}' in '{}'", field, text))
        })
        .collect()
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
