//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["--help"])
        .passes()
        .stdout_has("race")
        .stdout_has("results")
        .stdout_has("report")
        .stdout_has("toggle")
        .stdout_has("add-time")
        .stdout_has("watch");
}

#[test]
fn completions_need_no_data_dir() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("chiptime");
    assert!(!temp.data_dir().exists());
}
