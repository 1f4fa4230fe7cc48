//! Config specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn defaults_are_printed_as_toml() {
    Project::empty()
        .sg()
        .args(&["config"])
        .passes()
        .stdout_has("lock_key_prefix = \"lock:\"")
        .stdout_has("[spin]")
        .stdout_has("poll_interval = \"50ms\"")
        .stdout_has("[pubsub]")
        .stdout_has("watchdog = true");
}

#[test]
fn file_overrides_are_merged_over_defaults() {
    let project = Project::empty().file(
        "sg.toml",
        "[spin]\npoll_interval = \"10ms\"\n\n[pubsub]\nwatchdog = false\n",
    );

    project
        .sg()
        .args(&["--config", "sg.toml", "config"])
        .passes()
        .stdout_has("poll_interval = \"10ms\"")
        .stdout_has("ttl = \"3s\"")
        .stdout_has("watchdog = false");
}

#[test]
fn printed_config_round_trips() {
    let project = Project::empty();
    let printed = project.sg().args(&["config"]).passes().stdout();
    std::fs::write(project.join("sg.toml"), &printed).unwrap();

    let reprinted = project
        .sg()
        .args(&["--config", "sg.toml", "config"])
        .passes()
        .stdout();

    assert_eq!(printed, reprinted);
}

#[test]
fn json_config_uses_readable_durations() {
    let output = Project::empty().sg().args(&["config", "--json"]).passes();
    let config = output.json();

    assert_eq!(config["spin"]["ttl"], "3s");
    assert_eq!(config["optimistic"]["max_attempts"], 3);
}
