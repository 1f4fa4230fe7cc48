// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The contract every concurrency strategy implements

use crate::error::ParseStrategyError;
use crate::stats::StatsSnapshot;
use crate::{LocalMutexStrategy, OptimisticStrategy, PubSubLockStrategy, SpinLockStrategy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sg_adapters::{CoordinationStore, ResourceStore};
use sg_core::{Adjustment, GuardConfig, Record, ResourceId, StockError};
use std::str::FromStr;
use std::sync::Arc;

/// Which discipline guards the critical section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// One in-process mutex for every resource
    Local,
    /// Set-if-absent lock key, polled at a fixed interval
    Spin,
    /// Lease with release notifications and a renewal watchdog
    PubSub,
    /// Versioned conditional writes, no lock
    Optimistic,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Local,
        StrategyKind::Spin,
        StrategyKind::PubSub,
        StrategyKind::Optimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Local => "local",
            StrategyKind::Spin => "spin",
            StrategyKind::PubSub => "pubsub",
            StrategyKind::Optimistic => "optimistic",
        }
    }

    /// Whether the strategy serializes writers through a lock key
    pub fn uses_lock_key(&self) -> bool {
        matches!(self, StrategyKind::Spin | StrategyKind::PubSub)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "mutex" => Ok(StrategyKind::Local),
            "spin" | "spin-lock" => Ok(StrategyKind::Spin),
            "pubsub" | "pub-sub" => Ok(StrategyKind::PubSub),
            "optimistic" => Ok(StrategyKind::Optimistic),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Adjusts stock records under some concurrency discipline.
///
/// Every call ends with either the committed record or a typed
/// [`StockError`]; lock resources are released on every exit path.
#[async_trait]
pub trait StockStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn apply(&self, adjustment: Adjustment) -> Result<Record, StockError>;

    async fn decrease(&self, id: &ResourceId, amount: u64) -> Result<Record, StockError> {
        self.apply(Adjustment::decrease(id.clone(), amount)).await
    }

    async fn increase(&self, id: &ResourceId, amount: u64) -> Result<Record, StockError> {
        self.apply(Adjustment::increase(id.clone(), amount)).await
    }

    /// Current committed record, read without coordination
    async fn current(&self, id: &ResourceId) -> Result<Record, StockError>;

    fn stats(&self) -> StatsSnapshot;
}

/// Construct a strategy of `kind` over the given stores
pub fn build_strategy<S, C>(
    kind: StrategyKind,
    config: &GuardConfig,
    store: S,
    coordination: C,
) -> Arc<dyn StockStrategy>
where
    S: ResourceStore,
    C: CoordinationStore,
{
    match kind {
        StrategyKind::Local => Arc::new(LocalMutexStrategy::new(store)),
        StrategyKind::Spin => Arc::new(SpinLockStrategy::new(store, coordination, config.clone())),
        StrategyKind::PubSub => {
            Arc::new(PubSubLockStrategy::new(store, coordination, config.clone()))
        }
        StrategyKind::Optimistic => Arc::new(OptimisticStrategy::new(store, config.clone())),
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
