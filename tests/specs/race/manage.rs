//! Race management specs

use crate::prelude::*;

#[test]
fn list_empty() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "list"])
        .passes()
        .stdout_eq("No races found.\n");
}

#[test]
fn add_then_list() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "list"])
        .passes()
        .stdout_has("NAME")
        .stdout_has("10km")
        .stdout_has("2024-01-01 09:00")
        .stdout_has("10:00");
}

#[test]
fn list_as_json() {
    let temp = Project::with_race();
    let output = temp.chiptime().args(&["--output", "json", "race", "list"]).passes();
    let races: serde_json::Value = serde_json::from_str(output.stdout()).unwrap();
    assert_eq!(races[0]["name"], "10km");
    assert_eq!(races[0]["chips"], 3);
    assert_eq!(races[0]["live_update"], false);
}

#[test]
fn chips_from_file() {
    let temp = Project::empty();
    temp.file("chips.txt", "1\n2\n3\n");
    temp.chiptime()
        .args(&["race", "add", "5km", "--start", START, "--chips-file", "chips.txt"])
        .passes()
        .stdout_eq("Race '5km' added with 3 chips\n");
}

#[test]
fn duplicate_race_fails() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "add", "10km", "--start", START])
        .fails()
        .stderr_has("race already exists: 10km");
}

#[test]
fn remove_deletes_race() {
    let temp = Project::with_race();
    temp.chiptime().args(&["results", "10km"]).passes();

    temp.chiptime()
        .args(&["race", "remove", "10km"])
        .passes()
        .stdout_eq("Race '10km' removed\n");
    temp.chiptime()
        .args(&["race", "list"])
        .passes()
        .stdout_eq("No races found.\n");
    assert!(!temp.data_dir().join("results").join("10km.json").exists());
}

#[test]
fn set_file_rebuilds_results() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "add", "10km", "--start", START, "--min-time", "10:00"])
        .args(&["--chips", "42,7,9"])
        .passes();
    temp.chiptime()
        .args(&["results", "10km"])
        .passes()
        .stdout_eq("No results\n");

    temp.file("punches.tsv", PUNCHES);
    temp.chiptime()
        .args(&["race", "set-file", "10km", "punches.tsv"])
        .passes()
        .stdout_has("(2 results)");
}
