// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-free versioned writes with bounded retry
//!
//! Each attempt re-reads the record, recomputes the new quantity against what
//! it just read and commits only if the version is unchanged. Whichever write
//! reaches the store first wins; losers back off and start over.

use crate::section::check_amount;
use crate::stats::{StatsSnapshot, StrategyStats};
use crate::strategy::{StockStrategy, StrategyKind};
use async_trait::async_trait;
use sg_adapters::ResourceStore;
use sg_core::{
    retry, Adjustment, AttemptContext, Direction, GuardConfig, JitterSource, RandomJitter, Record,
    ResourceId, RetryError, RetryPolicy, StockError,
};
use tokio::time::Instant;

/// Outcome of a single conditional write attempt
#[derive(Debug)]
enum AttemptError {
    /// Another writer committed first
    Conflict,
    Failed(StockError),
}

pub struct OptimisticStrategy<S> {
    store: S,
    config: GuardConfig,
    jitter: Box<dyn JitterSource>,
    stats: StrategyStats,
}

impl<S: ResourceStore> OptimisticStrategy<S> {
    pub fn new(store: S, config: GuardConfig) -> Self {
        Self {
            store,
            config,
            jitter: Box::new(RandomJitter),
            stats: StrategyStats::new(),
        }
    }

    /// Replace the source that places jittered backoff sleeps
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    fn policy(&self, direction: Direction) -> &RetryPolicy {
        match direction {
            Direction::Decrease => &self.config.optimistic,
            Direction::Increase => &self.config.increase,
        }
    }

    async fn attempt(
        &self,
        adjustment: &Adjustment,
        ctx: AttemptContext,
    ) -> Result<Record, AttemptError> {
        let record = self
            .store
            .read(&adjustment.id)
            .await
            .map_err(|e| AttemptError::Failed(e.into()))?;
        let quantity = record
            .adjusted_quantity(adjustment.direction, adjustment.amount)
            .map_err(AttemptError::Failed)?;

        let committed = self
            .store
            .write_if_version_matches(&adjustment.id, quantity, record.version)
            .await
            .map_err(|e| AttemptError::Failed(e.into()))?;

        if committed {
            tracing::debug!(
                caller_id = %adjustment.caller,
                resource_id = %adjustment.id,
                attempt = ctx.attempt_number,
                version = record.version + 1,
                "committed"
            );
            Ok(record.successor(quantity))
        } else {
            self.stats.record_conflict();
            tracing::debug!(
                caller_id = %adjustment.caller,
                resource_id = %adjustment.id,
                attempt = ctx.attempt_number,
                max_attempts = ctx.max_attempts,
                seen_version = record.version,
                "version conflict"
            );
            Err(AttemptError::Conflict)
        }
    }
}

#[async_trait]
impl<S: ResourceStore> StockStrategy for OptimisticStrategy<S> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Optimistic
    }

    async fn apply(&self, adjustment: Adjustment) -> Result<Record, StockError> {
        check_amount(&adjustment)?;
        let start = Instant::now();
        if adjustment.is_expired() {
            return Err(StockError::DeadlineExceeded {
                id: adjustment.id.clone(),
                waited: start.elapsed(),
            });
        }

        let policy = self.policy(adjustment.direction);
        let target = &adjustment;
        let result = retry(
            policy,
            self.jitter.as_ref(),
            adjustment.deadline,
            |e| matches!(e, AttemptError::Conflict),
            move |ctx| self.attempt(target, ctx),
        )
        .await;

        match result {
            Ok(record) => Ok(record),
            Err(RetryError::Aborted {
                error: AttemptError::Failed(e),
                ..
            }) => Err(e),
            Err(RetryError::Aborted { attempt, .. })
            | Err(RetryError::Exhausted {
                attempts: attempt, ..
            }) => {
                tracing::warn!(
                    caller_id = %adjustment.caller,
                    resource_id = %adjustment.id,
                    attempts = attempt,
                    "optimistic retries exhausted"
                );
                Err(StockError::ConcurrencyExhausted {
                    id: adjustment.id.clone(),
                    attempts: attempt,
                })
            }
            Err(RetryError::DeadlineExceeded { .. }) => Err(StockError::DeadlineExceeded {
                id: adjustment.id.clone(),
                waited: start.elapsed(),
            }),
        }
    }

    async fn current(&self, id: &ResourceId) -> Result<Record, StockError> {
        Ok(self.store.read(id).await?)
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
#[path = "optimistic_tests.rs"]
mod tests;
