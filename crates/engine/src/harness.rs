// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent trial runner
//!
//! Spawns one task per caller, releases them together through a barrier and
//! tallies what came back. Individual caller failures are results, not
//! harness errors.

use crate::error::HarnessError;
use crate::stats::StatsSnapshot;
use crate::strategy::{StockStrategy, StrategyKind};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use sg_core::{Adjustment, CallerId, Direction, FailureKind, Record, ResourceId, StockError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::Instrument;

/// Callers aimed at one resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialTarget {
    pub id: ResourceId,
    pub callers: usize,
}

/// What a trial runs: every caller applies the same `amount` in `direction`
#[derive(Clone, Debug)]
pub struct TrialPlan {
    pub targets: Vec<TrialTarget>,
    pub amount: u64,
    pub direction: Direction,
    /// Per-caller bound, measured from the moment callers are released
    pub timeout: Option<Duration>,
}

impl TrialPlan {
    pub fn new(amount: u64) -> Self {
        Self {
            targets: Vec::new(),
            amount,
            direction: Direction::Decrease,
            timeout: None,
        }
    }

    /// `callers` decreases of `amount` against a single resource
    pub fn single(id: impl Into<ResourceId>, callers: usize, amount: u64) -> Self {
        Self::new(amount).with_target(id, callers)
    }

    pub fn with_target(mut self, id: impl Into<ResourceId>, callers: usize) -> Self {
        self.targets.push(TrialTarget {
            id: id.into(),
            callers,
        });
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn caller_count(&self) -> usize {
        self.targets.iter().map(|t| t.callers).sum()
    }
}

/// Tally of a finished trial
#[derive(Debug, Serialize)]
pub struct TrialReport {
    pub strategy: StrategyKind,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: BTreeMap<FailureKind, usize>,
    pub final_records: Vec<Record>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub stats: StatsSnapshot,
    pub started_at: DateTime<Utc>,
    /// Per-caller results in completion order
    #[serde(skip)]
    pub outcomes: Vec<Result<Record, StockError>>,
}

impl TrialReport {
    /// Final state of the first (for single-target trials, the only) resource
    pub fn final_record(&self) -> Option<&Record> {
        self.final_records.first()
    }

    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// Versions committed by successful callers, sorted
    pub fn committed_versions(&self, id: &ResourceId) -> Vec<u64> {
        let mut versions: Vec<u64> = self
            .outcomes
            .iter()
            .filter_map(|o| o.as_ref().ok())
            .filter(|r| &r.id == id)
            .map(|r| r.version)
            .collect();
        versions.sort_unstable();
        versions
    }
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Run `caller_count` concurrent decreases of `amount` against `id`
pub async fn run_concurrent_trial(
    strategy: Arc<dyn StockStrategy>,
    id: impl Into<ResourceId>,
    caller_count: usize,
    amount: u64,
) -> Result<TrialReport, HarnessError> {
    run_trial(strategy, &TrialPlan::single(id, caller_count, amount)).await
}

/// Run every caller in `plan` concurrently and collect the results
pub async fn run_trial(
    strategy: Arc<dyn StockStrategy>,
    plan: &TrialPlan,
) -> Result<TrialReport, HarnessError> {
    let caller_count = plan.caller_count();
    if caller_count == 0 {
        return Err(HarnessError::NoCallers);
    }

    let kind = strategy.kind();
    let stats_before = strategy.stats();
    let started_at = Utc::now();
    let barrier = Arc::new(Barrier::new(caller_count));
    let mut tasks = JoinSet::new();

    tracing::info!(
        strategy = %kind,
        callers = caller_count,
        amount = plan.amount,
        direction = %plan.direction,
        "starting trial"
    );

    let start = Instant::now();
    let mut n = 0usize;
    for target in &plan.targets {
        for _ in 0..target.callers {
            n += 1;
            let caller = CallerId::new(format!("caller-{n}"));
            let span = tracing::info_span!(
                "caller",
                caller_id = %caller,
                resource_id = %target.id
            );
            let mut adjustment = Adjustment::new(target.id.clone(), plan.direction, plan.amount)
                .with_caller(caller);
            let timeout = plan.timeout;
            let strategy = Arc::clone(&strategy);
            let barrier = Arc::clone(&barrier);

            tasks.spawn(
                async move {
                    barrier.wait().await;
                    if let Some(timeout) = timeout {
                        adjustment = adjustment.with_timeout(timeout);
                    }
                    let outcome = strategy.apply(adjustment).await;
                    if let Err(e) = &outcome {
                        tracing::debug!(error = %e, "caller failed");
                    }
                    outcome
                }
                .instrument(span),
            );
        }
    }

    let mut outcomes = Vec::with_capacity(caller_count);
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined?);
    }
    let elapsed = start.elapsed();

    let mut failures = BTreeMap::new();
    for outcome in &outcomes {
        if let Err(e) = outcome {
            *failures.entry(e.kind()).or_insert(0) += 1;
        }
    }
    let failure_count: usize = failures.values().sum();

    let mut final_records = Vec::with_capacity(plan.targets.len());
    for target in &plan.targets {
        if final_records.iter().any(|r: &Record| r.id == target.id) {
            continue;
        }
        final_records.push(strategy.current(&target.id).await?);
    }

    let report = TrialReport {
        strategy: kind,
        success_count: outcomes.len() - failure_count,
        failure_count,
        failures,
        final_records,
        elapsed,
        stats: strategy.stats().since(&stats_before),
        started_at,
        outcomes,
    };
    tracing::info!(
        strategy = %kind,
        succeeded = report.success_count,
        failed = report.failure_count,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "trial finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
