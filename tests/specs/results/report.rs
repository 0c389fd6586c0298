//! Results and report specs

use crate::prelude::*;

#[test]
fn results_keep_first_qualifying_punch_per_chip() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["results", "10km"])
        .passes()
        .stdout_has("CHIP")
        .stdout_has("12:00     09:12:00  OK")
        .stdout_has("14:31     09:14:31  OK")
        .stdout_lacks("09:20:00")
        .stdout_lacks("99 ")
        .stdout_lacks("09:05:00");
}

#[test]
fn results_search_filters_by_chip() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["results", "10km", "--search", "4"])
        .passes()
        .stdout_has("42 ")
        .stdout_lacks("7 ");
}

#[test]
fn report_lists_valid_results() {
    let temp = Project::with_race();
    temp.chiptime().args(&["report", "10km"]).passes().stdout_eq(
        "Results for 10km\n\
         Started: 2024-01-01 09:00\n\
         Minimum time: 10:00\n\
         \n\
         Chip\tTime\n\
         --------------------\n\
         42\t12:00\n\
         7\t14:31\n",
    );
}

#[test]
fn results_as_json() {
    let temp = Project::with_race();
    let output = temp
        .chiptime()
        .args(&["--output", "json", "results", "10km"])
        .passes();
    let results: serde_json::Value = serde_json::from_str(output.stdout()).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 2);
    assert_eq!(results[0]["chip"], "42");
}

#[test]
fn missing_punch_file_warns() {
    let temp = Project::with_race();
    std::fs::remove_file(temp.path().join("punches.tsv")).unwrap();
    temp.chiptime()
        .args(&["results", "10km", "--refresh"])
        .passes()
        .stdout_eq("No results\n")
        .stderr_has("warning: cannot read punch file");
}
