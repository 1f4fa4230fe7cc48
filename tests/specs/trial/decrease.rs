//! Decrease trial specs

use crate::prelude::*;

#[test]
fn local_mutex_drains_exactly() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "local", "--quantity", "100", "--callers", "100"])
        .passes()
        .stdout_has("Strategy: local")
        .stdout_has("Succeeded: 100")
        .stdout_has("Failed: 0")
        .stdout_has("Final: sku-1=0 (v100)");
}

#[test]
fn spin_lock_drains_exactly() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "spin", "--callers", "50", "--quantity", "50"])
        .passes()
        .stdout_has("Succeeded: 50")
        .stdout_has("Final: sku-1=0 (v50)");
}

#[test]
fn oversubscribed_trial_splits_evenly_for_lock_strategies() {
    for strategy in ["local", "spin", "pubsub"] {
        Project::empty()
            .sg()
            .args(&["trial", "--strategy", strategy, "--quantity", "10", "--callers", "20"])
            .passes()
            .stdout_has("Succeeded: 10")
            .stdout_has("Failed: 10")
            .stdout_has("  insufficient_stock: 10")
            .stdout_has("Final: sku-1=0");
    }
}

#[test]
fn optimistic_trial_conserves_stock() {
    let output = Project::empty()
        .sg()
        .args(&[
            "trial", "--strategy", "optimistic", "--quantity", "100", "--callers", "5",
            "--amount", "5", "--json",
        ])
        .passes();
    let report = output.json();

    let succeeded = report["success_count"].as_u64().unwrap();
    let failed = report["failure_count"].as_u64().unwrap();
    assert_eq!(succeeded + failed, 5);
    assert_eq!(report["final_records"][0]["quantity"], 100 - 5 * succeeded);
    assert_eq!(report["final_records"][0]["version"], succeeded);
}

#[test]
fn independent_resources_each_drain() {
    Project::empty()
        .sg()
        .args(&[
            "trial", "--strategy", "spin", "--resources", "2", "--quantity", "30", "--callers",
            "30",
        ])
        .passes()
        .stdout_has("Succeeded: 60")
        .stdout_has("Final: sku-1=0 (v30) sku-2=0 (v30)");
}

#[test]
fn deadline_turns_queued_callers_into_timeouts() {
    // each section holds the mutex for 50ms, callers give up after 120ms
    Project::empty()
        .sg()
        .args(&[
            "trial", "--strategy", "local", "--quantity", "10", "--callers", "5", "--hold-ms",
            "50", "--timeout-ms", "120",
        ])
        .passes()
        .stdout_has("deadline_exceeded")
        .stdout_lacks("insufficient_stock");
}
