//! Live update flag and watch specs

use crate::prelude::*;

fn live_flag(temp: &Project) -> serde_json::Value {
    let output = temp.chiptime().args(&["--output", "json", "race", "list"]).passes();
    let races: serde_json::Value = serde_json::from_str(output.stdout()).unwrap();
    races[0]["live_update"].clone()
}

#[test]
fn live_on_and_off() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "live", "10km", "on"])
        .passes()
        .stdout_eq("Live update for '10km' is on\n");
    assert_eq!(live_flag(&temp), true);

    temp.chiptime()
        .args(&["race", "live", "10km", "off"])
        .passes()
        .stdout_eq("Live update for '10km' is off\n");
    assert_eq!(live_flag(&temp), false);

    temp.chiptime()
        .args(&["watch"])
        .passes()
        .stdout_eq("No races flagged for live update.\n");
}

#[test]
fn live_needs_punch_file() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "add", "5km", "--start", "2024-01-01 10:00"])
        .passes();
    temp.chiptime()
        .args(&["race", "live", "5km", "on"])
        .fails()
        .stderr_has("race 5km has no punch file configured");
}

#[test]
fn live_for_unknown_race_fails() {
    let temp = Project::empty();
    temp.chiptime()
        .args(&["race", "live", "nope", "off"])
        .fails()
        .stderr_has("race not found: nope");
}

#[cfg(unix)]
#[test]
fn interrupted_watch_is_resumed_by_watch_all() {
    let temp = Project::with_race();

    let mut watch = temp.spawn(&["watch", "10km"]);
    watch.wait_stderr("Watching '10km'");
    assert!(watch.interrupt().success());
    assert_eq!(live_flag(&temp), true);

    let mut watch_all = temp.spawn(&["watch"]);
    watch_all.wait_stdout("Watching: 10km");
    assert!(watch_all.interrupt().success());
    assert_eq!(live_flag(&temp), true);
}

#[cfg(unix)]
#[test]
fn watch_all_reports_updates() {
    let temp = Project::with_race();
    temp.chiptime()
        .args(&["race", "live", "10km", "on"])
        .passes();

    let mut watch_all = temp.spawn(&["watch"]);
    watch_all.wait_stdout("Watching: 10km");
    std::thread::sleep(std::time::Duration::from_millis(1100));
    temp.file("punches.tsv", &format!("{}7\t2024-01-01 09:30:00.000\n", PUNCHES));
    watch_all.wait_stdout("Updated: 10km");
    assert!(watch_all.interrupt().success());
}
