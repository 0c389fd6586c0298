//! Invalidation and manual time specs

use crate::prelude::*;

#[test]
fn toggle_promotes_next_punch() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["toggle", "10km", "42", "00:12:00"])
        .passes()
        .stdout_has("09:12:00  INVALID")
        .stdout_has("09:20:00  OK");

    temp.chiptime()
        .args(&["report", "10km"])
        .passes()
        .stdout_has("7\t14:31\n42\t20:00\n");
}

#[test]
fn toggle_twice_restores_result() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["toggle", "10km", "42", "2024-01-01 09:12:00"])
        .passes();
    temp.chiptime()
        .args(&["toggle", "10km", "42", "2024-01-01 09:12:00"])
        .passes()
        .stdout_lacks("INVALID")
        .stdout_lacks("09:20:00");
}

#[test]
fn toggle_unknown_result_fails() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["toggle", "10km", "42", "00:30:00"])
        .fails()
        .stderr_has("no result for chip 42");
}

#[test]
fn manual_time_is_listed() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["add-time", "10km", "9", "00:25:00"])
        .passes()
        .stdout_has("25:00     09:25:00  OK (manual)");

    temp.chiptime()
        .args(&["report", "10km"])
        .passes()
        .stdout_has("9\t25:00\n");
}

#[test]
fn manual_time_below_minimum_fails() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["add-time", "10km", "9", "00:09:00"])
        .fails()
        .stderr_has("time 09:00 for chip 9 is below the minimum 10:00");
}

#[test]
fn manual_time_for_unregistered_chip_fails() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["add-time", "10km", "99", "00:25:00"])
        .fails()
        .stderr_has("chip 99 is not registered in race 10km");
}
