// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;
use tempfile::TempDir;

fn entry(chip: &str, minute: u32) -> ManualEntry {
    ManualEntry {
        chip: chip.to_string(),
        time: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap(),
        race_name: "10km".to_string(),
    }
}

#[test]
fn missing_list_is_empty() {
    let dir = TempDir::new().unwrap();
    let manual = ManualTimes::new(JsonStore::open(dir.path()).unwrap());
    assert!(manual.load("10km").unwrap().is_empty());
}

#[test]
fn save_overwrites_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let manual = ManualTimes::new(store.clone());

    manual.save("10km", &[entry("7", 20), entry("3", 15)]).unwrap();
    manual.save("10km", &[entry("9", 30)]).unwrap();

    assert_eq!(manual.load("10km").unwrap(), vec![entry("9", 30)]);
    assert!(store.path_for("manual_times", "10km").exists());
}

#[test]
fn lists_are_per_race() {
    let dir = TempDir::new().unwrap();
    let manual = ManualTimes::new(JsonStore::open(dir.path()).unwrap());

    manual.save("10km", &[entry("7", 20)]).unwrap();
    assert!(manual.load("5km").unwrap().is_empty());

    manual.remove("10km").unwrap();
    assert!(manual.load("10km").unwrap().is_empty());
}

#[test]
fn rename_moves_list_and_entries() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let manual = ManualTimes::new(store.clone());
    manual.save("10km", &[entry("7", 20), entry("3", 15)]).unwrap();

    manual.rename("10km", "10k open").unwrap();

    let moved = manual.load("10k open").unwrap();
    assert_eq!(moved.len(), 2);
    assert!(moved.iter().all(|e| e.race_name == "10k open"));
    assert!(!store.path_for("manual_times", "10km").exists());
}

#[test]
fn rename_without_list_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let manual = ManualTimes::new(store.clone());

    manual.rename("10km", "10k open").unwrap();
    assert!(!store.path_for("manual_times", "10k open").exists());
}
