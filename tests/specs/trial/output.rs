//! Trial output specs

use crate::prelude::*;

#[test]
fn json_report_has_counts_and_final_records() {
    let output = Project::empty()
        .sg()
        .args(&["trial", "--strategy", "pubsub", "--quantity", "5", "--callers", "8", "--json"])
        .passes();
    let report = output.json();

    assert_eq!(report["strategy"], "pubsub");
    assert_eq!(report["success_count"], 5);
    assert_eq!(report["failure_count"], 3);
    assert_eq!(report["failures"]["insufficient_stock"], 3);
    assert_eq!(report["final_records"][0]["id"], "sku-1");
    assert!(report["elapsed_ms"].is_u64());
    assert!(report["started_at"].is_string());
}

#[test]
fn logs_go_to_stderr_and_leave_json_intact() {
    let output = Project::empty()
        .sg()
        .env("RUST_LOG", "sg_engine=debug")
        .args(&["trial", "--strategy", "local", "--quantity", "3", "--callers", "3", "--json"])
        .passes()
        .stderr_has("committed")
        .stderr_has("caller_id");

    assert_eq!(output.json()["success_count"], 3);
}

#[test]
fn quiet_by_default() {
    let output = Project::empty()
        .sg()
        .args(&["trial", "--strategy", "local", "--quantity", "3", "--callers", "3"])
        .passes();

    assert_eq!(output.stderr(), "");
}

#[test]
fn hold_time_shows_up_in_elapsed() {
    let output = Project::empty()
        .sg()
        .args(&[
            "trial", "--strategy", "local", "--quantity", "4", "--callers", "4", "--hold-ms", "25",
            "--json",
        ])
        .passes();

    // one mutex, four 25ms sections back to back
    assert!(output.json()["elapsed_ms"].as_u64().unwrap() >= 100);
}
