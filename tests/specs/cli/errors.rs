//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_race_fails() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["results", "nope"])
        .fails()
        .stderr_has("race not found: nope");
}

#[test]
fn bad_start_time_fails() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "add", "10km", "--start", "noon"])
        .fails()
        .stderr_has("invalid start time");
}

#[test]
fn bad_config_fails() {
    let temp = Project::empty();
    temp.file("data/chiptime.toml", "poll_interval = [");
    temp.chiptime().args(&["race", "list"]).fails();
}

#[test]
fn watch_without_punch_file_fails() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "add", "5km", "--start", START])
        .passes();
    temp.chiptime()
        .args(&["watch", "5km"])
        .fails()
        .stderr_has("race 5km has no punch file configured");
}
