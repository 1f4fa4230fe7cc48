// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use anyhow::Result;
use serde::Serialize;
use sg_engine::{StrategyKind, TrialReport};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Print a list of items, under `header` in text mode
pub fn print_list<T: Serialize + fmt::Display>(
    header: &str,
    items: &[T],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", header);
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

/// Human summary of a trial; serializes as the full report
#[derive(Serialize)]
#[serde(transparent)]
pub struct TrialSummary<'a>(pub &'a TrialReport);

impl fmt::Display for TrialSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Strategy: {}", report.strategy)?;
        writeln!(f, "Succeeded: {}", report.success_count)?;
        writeln!(f, "Failed: {}", report.failure_count)?;
        for (kind, count) in &report.failures {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        let finals: Vec<String> = report
            .final_records
            .iter()
            .map(|r| format!("{}={} (v{})", r.id, r.quantity, r.version))
            .collect();
        writeln!(f, "Final: {}", finals.join(" "))?;
        writeln!(f, "Elapsed: {}ms", report.elapsed.as_millis())?;

        let stats = &report.stats;
        if stats.lock_polls + stats.wakeups + stats.version_conflicts > 0 {
            writeln!(
                f,
                "Contention: {} polls, {} wakeups, {} conflicts",
                stats.lock_polls, stats.wakeups, stats.version_conflicts
            )?;
        }
        if stats.ownership_violations > 0 {
            writeln!(f, "Ownership violations: {}", stats.ownership_violations)?;
        }
        Ok(())
    }
}

/// One strategy's line in `sg compare`
#[derive(Debug, Serialize)]
pub struct CompareRow {
    pub strategy: StrategyKind,
    pub succeeded: usize,
    pub failed: usize,
    pub final_quantity: u64,
    pub elapsed_ms: u64,
    pub polls: u64,
    pub conflicts: u64,
}

impl CompareRow {
    pub const HEADER: &'static str =
        "STRATEGY     SUCCEEDED  FAILED   FINAL  ELAPSED_MS  POLLS  CONFLICTS";

    pub fn from_report(report: &TrialReport) -> Self {
        Self {
            strategy: report.strategy,
            succeeded: report.success_count,
            failed: report.failure_count,
            final_quantity: report.final_record().map_or(0, |r| r.quantity),
            elapsed_ms: report.elapsed.as_millis() as u64,
            polls: report.stats.lock_polls,
            conflicts: report.stats.version_conflicts,
        }
    }
}

impl fmt::Display for CompareRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:>9} {:>7} {:>7} {:>11} {:>6} {:>10}",
            self.strategy.as_str(),
            self.succeeded,
            self.failed,
            self.final_quantity,
            self.elapsed_ms,
            self.polls,
            self.conflicts
        )
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
