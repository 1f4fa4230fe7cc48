// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote spin-lock
//!
//! `Idle -> Acquiring -> (Held | Failed) -> Released`. Acquisition is a
//! set-if-absent of `lock:{id}` with a TTL, polled at a fixed interval up to
//! `max_attempts` times. Independent ids use independent keys.

use crate::guard::LeaseGuard;
use crate::section::{check_amount, run_section};
use crate::stats::{StatsSnapshot, StrategyStats};
use crate::strategy::{StockStrategy, StrategyKind};
use async_trait::async_trait;
use sg_adapters::{CoordinationStore, ResourceStore};
use sg_core::{
    Adjustment, GuardConfig, OwnerGen, Record, ResourceId, StockError, UuidOwnerGen,
};
use tokio::time::Instant;

pub struct SpinLockStrategy<S, C, G = UuidOwnerGen> {
    store: S,
    coordination: C,
    config: GuardConfig,
    owners: G,
    stats: StrategyStats,
}

impl<S: ResourceStore, C: CoordinationStore> SpinLockStrategy<S, C> {
    pub fn new(store: S, coordination: C, config: GuardConfig) -> Self {
        Self {
            store,
            coordination,
            config,
            owners: UuidOwnerGen,
            stats: StrategyStats::new(),
        }
    }
}

impl<S: ResourceStore, C: CoordinationStore, G: OwnerGen> SpinLockStrategy<S, C, G> {
    pub fn with_owners<G2: OwnerGen>(self, owners: G2) -> SpinLockStrategy<S, C, G2> {
        SpinLockStrategy {
            store: self.store,
            coordination: self.coordination,
            config: self.config,
            owners,
            stats: self.stats,
        }
    }

    async fn acquire(&self, adjustment: &Adjustment) -> Result<LeaseGuard<C>, StockError> {
        let spin = &self.config.spin;
        let key = self.config.lock_key(&adjustment.id);
        let owner = self.owners.next();
        let start = Instant::now();
        let max_attempts = spin.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if adjustment.is_expired() {
                return Err(StockError::DeadlineExceeded {
                    id: adjustment.id.clone(),
                    waited: start.elapsed(),
                });
            }

            if self.coordination.set_if_absent(&key, &owner, spin.ttl).await? {
                tracing::debug!(
                    caller_id = %adjustment.caller,
                    key = %key,
                    %owner,
                    attempt,
                    waited_ms = start.elapsed().as_millis() as u64,
                    "lock acquired"
                );
                return Ok(LeaseGuard::new(
                    self.coordination.clone(),
                    key,
                    owner,
                    spin.release,
                    self.stats.clone(),
                ));
            }

            self.stats.record_poll();
            if attempt == max_attempts {
                break;
            }
            if adjustment.would_overrun(spin.poll_interval) {
                return Err(StockError::DeadlineExceeded {
                    id: adjustment.id.clone(),
                    waited: start.elapsed(),
                });
            }
            tracing::trace!(caller_id = %adjustment.caller, key = %key, attempt, "lock busy, polling");
            tokio::time::sleep(spin.poll_interval).await;
        }

        tracing::warn!(
            caller_id = %adjustment.caller,
            key = %key,
            attempts = max_attempts,
            "lock acquisition timed out"
        );
        Err(StockError::LockAcquisitionTimeout {
            key,
            attempts: max_attempts,
            waited: start.elapsed(),
        })
    }
}

#[async_trait]
impl<S, C, G> StockStrategy for SpinLockStrategy<S, C, G>
where
    S: ResourceStore,
    C: CoordinationStore,
    G: OwnerGen,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::Spin
    }

    async fn apply(&self, adjustment: Adjustment) -> Result<Record, StockError> {
        check_amount(&adjustment)?;
        let guard = self.acquire(&adjustment).await?;
        let result = run_section(&self.store, &adjustment).await;
        guard.release().await;
        result
    }

    async fn current(&self, id: &ResourceId) -> Result<Record, StockError> {
        Ok(self.store.read(id).await?)
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
#[path = "spin_tests.rs"]
mod tests;
