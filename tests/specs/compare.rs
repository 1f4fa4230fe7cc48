//! Compare specs

use crate::prelude::*;

#[test]
fn compare_prints_one_row_per_strategy() {
    let output = Project::empty()
        .sg()
        .args(&["compare", "--quantity", "10", "--callers", "10"])
        .passes()
        .stdout_has("STRATEGY");

    let rows: Vec<String> = output.stdout().lines().skip(1).map(str::to_string).collect();
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.split_whitespace().next())
        .collect();
    assert_eq!(names, vec!["local", "spin", "pubsub", "optimistic"]);
}

#[test]
fn compare_json_runs_each_strategy_on_fresh_stock() {
    let output = Project::empty()
        .sg()
        .args(&["compare", "--quantity", "20", "--callers", "10", "--json"])
        .passes();
    let rows = output.json();

    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    for row in &rows[..3] {
        assert_eq!(row["succeeded"], 10, "{row}");
        assert_eq!(row["final_quantity"], 10, "{row}");
    }
    let optimistic = &rows[3];
    assert_eq!(optimistic["strategy"], "optimistic");
    let succeeded = optimistic["succeeded"].as_u64().unwrap();
    assert_eq!(optimistic["final_quantity"], 20 - succeeded);
}
