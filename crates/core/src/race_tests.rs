// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;
use yare::parameterized;

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn ten_k() -> Race {
    Race::new("10km", at(9, 0, 0), Duration::from_secs(600)).with_chips(["42", "7"])
}

#[test]
fn serializes_min_time_as_duration_string() {
    let race = ten_k().with_results_file("/tmp/punches.tsv");
    let json = serde_json::to_value(&race).unwrap();

    assert_eq!(json["name"], "10km");
    assert_eq!(json["startTime"], "2024-01-01T09:00:00");
    assert_eq!(json["minTime"], "10m");
    assert_eq!(json["resultsFile"], "/tmp/punches.tsv");
    assert_eq!(json["liveUpdate"], false);
    assert_eq!(json["chips"], serde_json::json!(["42", "7"]));

    let parsed: Race = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, race);
}

#[test]
fn rejects_unparseable_min_time() {
    let json = r#"{"name":"x","startTime":"2024-01-01T09:00:00","minTime":"ten minutes"}"#;
    assert!(serde_json::from_str::<Race>(json).is_err());
}

#[test]
fn missing_optional_fields_default() {
    let json = r#"{"name":"x","startTime":"2024-01-01T09:00:00","minTime":"1h 5m"}"#;
    let race: Race = serde_json::from_str(json).unwrap();

    assert_eq!(race.min_time, Duration::from_secs(3900));
    assert!(race.chips.is_empty());
    assert!(race.invalid_times.is_empty());
    assert!(race.source_file().is_none());
    assert!(!race.live_update);
}

#[test]
fn empty_results_file_is_no_source() {
    let race = ten_k().with_results_file("");
    assert!(race.source_file().is_none());

    let race = ten_k().with_results_file("punches.tsv");
    assert_eq!(race.source_file(), Some(Path::new("punches.tsv")));
}

#[test]
fn registration_lookup() {
    let race = ten_k();
    assert!(race.is_registered("42"));
    assert!(!race.is_registered("99"));
}

#[test]
fn elapsed_saturates_before_start() {
    let race = ten_k();
    assert_eq!(race.elapsed(at(8, 59, 0)), Duration::ZERO);
    assert_eq!(race.elapsed(at(9, 15, 0)), Duration::from_secs(900));
}

#[parameterized(
    before_start = { at(8, 59, 59), false },
    at_start = { at(9, 0, 0), false },
    below_minimum = { at(9, 9, 59), false },
    exactly_minimum = { at(9, 10, 0), true },
    well_after = { at(10, 30, 0), true },
)]
fn qualification(time: NaiveDateTime, expected: bool) {
    assert_eq!(ten_k().qualifies(time), expected);
}

#[test]
fn zero_minimum_still_requires_after_start() {
    let race = Race::new("open", at(9, 0, 0), Duration::ZERO);
    assert!(!race.qualifies(at(9, 0, 0)));
    assert!(race.qualifies(at(9, 0, 1)));
}
