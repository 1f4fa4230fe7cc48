// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote lock with release notifications
//!
//! A contended caller subscribes to the key's release channel and sleeps
//! until it is woken, the holder's TTL runs out, or its own wait bound is
//! reached. A wake only means "try again": the caller re-attempts the
//! set-if-absent and goes back to waiting if someone else got there first.
//! While held, a watchdog renews the lease.

use crate::guard::LeaseGuard;
use crate::section::{check_amount, run_section};
use crate::stats::{StatsSnapshot, StrategyStats};
use crate::strategy::{StockStrategy, StrategyKind};
use crate::watchdog::Watchdog;
use async_trait::async_trait;
use sg_adapters::{CoordinationStore, ResourceStore, Subscription};
use sg_core::{
    Adjustment, GuardConfig, OwnerGen, Record, ReleaseMode, ResourceId, StockError, UuidOwnerGen,
};
use std::time::Duration;
use tokio::time::Instant;

pub struct PubSubLockStrategy<S, C, G = UuidOwnerGen> {
    store: S,
    coordination: C,
    config: GuardConfig,
    owners: G,
    stats: StrategyStats,
}

impl<S: ResourceStore, C: CoordinationStore> PubSubLockStrategy<S, C> {
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

impl<S: ResourceStore, C: CoordinationStore, G: OwnerGen> PubSubLockStrategy<S, C, G> {
    pub fn with_owners<G2: OwnerGen>(self, owners: G2) -> PubSubLockStrategy<S, C, G2> {
        PubSubLockStrategy {
            store: self.store,
            coordination: self.coordination,
            config: self.config,
            owners,
            stats: self.stats,
        }
    }

    async fn acquire(&self, adjustment: &Adjustment) -> Result<LeaseGuard<C>, StockError> {
        let pubsub = &self.config.pubsub;
        let key = self.config.lock_key(&adjustment.id);
        let channel = self.config.release_channel(&adjustment.id);
        let owner = self.owners.next();
        let start = Instant::now();
        if adjustment.is_expired() {
            return Err(StockError::DeadlineExceeded {
                id: adjustment.id.clone(),
                waited: start.elapsed(),
            });
        }

        // The caller's own deadline wins over the lock's wait bound when tighter
        let wait_bound = start + pubsub.wait_timeout;
        let (bound, caller_bound) = match adjustment.deadline {
            Some(deadline) if deadline < wait_bound => (deadline, true),
            _ => (wait_bound, false),
        };

        let mut attempts = 0u32;
        let mut subscription: Option<Subscription> = None;

        loop {
            attempts += 1;
            if self
                .coordination
                .set_if_absent(&key, &owner, pubsub.lease_time)
                .await?
            {
                tracing::debug!(
                    caller_id = %adjustment.caller,
                    key = %key,
                    %owner,
                    attempts,
                    waited_ms = start.elapsed().as_millis() as u64,
                    "lease acquired"
                );
                let mut guard = LeaseGuard::new(
                    self.coordination.clone(),
                    key.clone(),
                    owner.clone(),
                    ReleaseMode::Atomic,
                    self.stats.clone(),
                )
                .with_notify(channel);
                if pubsub.watchdog {
                    guard = guard.with_watchdog(Watchdog::spawn(
                        self.coordination.clone(),
                        key,
                        owner,
                        pubsub.lease_time,
                        pubsub.renew_every(),
                        self.stats.clone(),
                    ));
                }
                return Ok(guard);
            }
            self.stats.record_poll();

            // Subscribe before the next attempt so a release landing between
            // the failed attempt and the subscription is not missed
            if subscription.is_none() {
                subscription = Some(self.coordination.subscribe(&channel).await?);
                continue;
            }

            let now = Instant::now();
            if now >= bound {
                return Err(if caller_bound {
                    StockError::DeadlineExceeded {
                        id: adjustment.id.clone(),
                        waited: start.elapsed(),
                    }
                } else {
                    tracing::warn!(
                        caller_id = %adjustment.caller,
                        key = %key,
                        attempts,
                        "lease wait timed out"
                    );
                    StockError::LockAcquisitionTimeout {
                        key,
                        attempts,
                        waited: start.elapsed(),
                    }
                });
            }

            // A holder that dies never publishes; its TTL bounds the wait instead
            let holder_ttl = self
                .coordination
                .ttl(&key)
                .await?
                .unwrap_or(Duration::ZERO);
            let nap = holder_ttl.min(bound - now);

            if let Some(subscription) = subscription.as_mut() {
                tokio::select! {
                    _ = subscription.wait() => {
                        self.stats.record_wakeup();
                        tracing::trace!(caller_id = %adjustment.caller, key = %key, "woken by release");
                    }
                    _ = tokio::time::sleep(nap) => {}
                }
            }
        }
    }
}

#[async_trait]
impl<S, C, G> StockStrategy for PubSubLockStrategy<S, C, G>
where
    S: ResourceStore,
    C: CoordinationStore,
    G: OwnerGen,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::PubSub
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
#[path = "pubsub_tests.rs"]
mod tests;
