//! Race edit specs

use crate::prelude::*;

#[test]
fn new_start_rebuilds_results() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "edit", "10km", "--start", "2024-01-01 09:01"])
        .passes()
        .stdout_has("Race '10km' updated (2 results)");

    temp.chiptime()
        .args(&["report", "10km"])
        .passes()
        .stdout_has("Started: 2024-01-01 09:01\n")
        .stdout_has("42\t11:00\n")
        .stdout_has("7\t13:31\n");
}

#[test]
fn new_chip_list_drops_unlisted_chips() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "edit", "10km", "--chips", "42"])
        .passes();

    temp.chiptime()
        .args(&["report", "10km"])
        .passes()
        .stdout_has("42\t12:00\n")
        .stdout_lacks("7\t14:31");
}

#[test]
fn rename_keeps_manual_times() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["add-time", "10km", "9", "00:25:00"])
        .passes();

    temp.chiptime()
        .args(&["race", "edit", "10km", "--rename", "10k open"])
        .passes()
        .stdout_has("Race '10k open' updated");

    temp.chiptime()
        .args(&["report", "10k open"])
        .passes()
        .stdout_has("9\t25:00\n");
    temp.chiptime()
        .args(&["report", "10km"])
        .fails()
        .stderr_has("race not found: 10km");
}

#[test]
fn rename_onto_existing_race_fails() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "add", "5km", "--start", "2024-01-01 10:00"])
        .passes();

    temp.chiptime()
        .args(&["race", "edit", "10km", "--rename", "5km"])
        .fails()
        .stderr_has("race already exists: 5km");
}

#[test]
fn similar_names_keep_separate_manual_times() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "edit", "10km", "--rename", "10 km"])
        .passes();
    temp.chiptime()
        .args(&["race", "add", "10_km", "--start", "2024-01-01 09:00", "--chips", "9"])
        .passes();
    temp.chiptime()
        .args(&["add-time", "10_km", "9", "00:25:00"])
        .passes();

    temp.chiptime()
        .args(&["report", "10 km"])
        .passes()
        .stdout_lacks("9\t25:00");
    temp.chiptime()
        .args(&["report", "10_km"])
        .passes()
        .stdout_has("9\t25:00\n");
}
