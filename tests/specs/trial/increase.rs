//! Increase trial specs

use crate::prelude::*;

#[test]
fn increase_adds_every_callers_amount() {
    for strategy in ["local", "spin", "pubsub"] {
        Project::empty()
            .sg()
            .args(&[
                "trial", "--strategy", strategy, "--increase", "--quantity", "0", "--callers",
                "10", "--amount", "3",
            ])
            .passes()
            .stdout_has("Succeeded: 10")
            .stdout_has("Final: sku-1=30 (v10)");
    }
}

#[test]
fn increase_never_reports_insufficient_stock() {
    Project::empty()
        .sg()
        .args(&["trial", "--strategy", "optimistic", "--increase", "--quantity", "0", "--callers", "1"])
        .passes()
        .stdout_has("Succeeded: 1")
        .stdout_has("Final: sku-1=1 (v1)");
}
