//! Argument and configuration error specs

use crate::prelude::*;

#[test]
fn unknown_strategy_is_rejected() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "semaphore"])
        .fails()
        .stderr_has("unknown strategy: semaphore");
}

#[test]
fn missing_strategy_is_rejected() {
    Project::empty()
        .sg()
        .args(&["trial"])
        .fails()
        .stderr_has("--strategy");
}

#[test]
fn zero_callers_is_rejected_with_a_suggestion() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "local", "--callers", "0"])
        .fails()
        .stderr_has("Invalid trial size")
        .stderr_has("suggestions:");
}

#[test]
fn zero_resources_is_rejected() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "spin", "--resources", "0"])
        .fails()
        .stderr_has("--resources must be at least 1");
}

#[test]
fn missing_config_file_is_reported() {
    Project::empty()
        .sg()
        .args(&["--config", "nope.toml", "config"])
        .fails()
        .stderr_has("Cannot use config 'nope.toml'")
        .stderr_has("exists and is readable");
}

#[test]
fn invalid_config_values_are_reported() {
    let project = Project::empty().file("sg.toml", "[spin]\nmax_attempts = 0\n");

    project
        .sg()
        .args(&["--config", "sg.toml", "trial", "--strategy", "spin"])
        .fails()
        .stderr_has("spin.max_attempts must be at least 1");
}

#[test]
fn malformed_durations_are_reported() {
    let project = Project::empty().file("sg.toml", "[pubsub]\nlease_time = \"a while\"\n");

    project
        .sg()
        .args(&["--config", "sg.toml", "config"])
        .fails()
        .stderr_has("Durations are written like");
}
