// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process mutual exclusion
//!
//! A single mutex guards the critical section for every resource id. Callers
//! adjusting different records still queue behind each other, and nothing is
//! shared with other processes. That ceiling is kept deliberately so the
//! strategy stays comparable with the distributed ones.

use crate::section::{check_amount, run_section};
use crate::stats::{StatsSnapshot, StrategyStats};
use crate::strategy::{StockStrategy, StrategyKind};
use async_trait::async_trait;
use sg_adapters::ResourceStore;
use sg_core::{Adjustment, Record, ResourceId, StockError};
use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct LocalMutexStrategy<S> {
    store: S,
    gate: Mutex<()>,
    stats: StrategyStats,
}

impl<S: ResourceStore> LocalMutexStrategy<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
            stats: StrategyStats::new(),
        }
    }
}

#[async_trait]
impl<S: ResourceStore> StockStrategy for LocalMutexStrategy<S> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Local
    }

    async fn apply(&self, adjustment: Adjustment) -> Result<Record, StockError> {
        check_amount(&adjustment)?;
        let start = Instant::now();
        // timeout_at polls the lock before its timer, so an uncontended gate
        // would otherwise admit a caller whose deadline already passed
        if adjustment.is_expired() {
            return Err(StockError::DeadlineExceeded {
                id: adjustment.id.clone(),
                waited: start.elapsed(),
            });
        }

        let _held = match adjustment.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, self.gate.lock())
                .await
                .map_err(|_| StockError::DeadlineExceeded {
                    id: adjustment.id.clone(),
                    waited: start.elapsed(),
                })?,
            None => self.gate.lock().await,
        };
        tracing::trace!(
            caller_id = %adjustment.caller,
            waited_ms = start.elapsed().as_millis() as u64,
            "entered critical section"
        );

        run_section(&self.store, &adjustment).await
    }

    async fn current(&self, id: &ResourceId) -> Result<Record, StockError> {
        Ok(self.store.read(id).await?)
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
