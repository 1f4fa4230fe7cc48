// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contention counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    lock_polls: AtomicU64,
    wakeups: AtomicU64,
    lease_extensions: AtomicU64,
    version_conflicts: AtomicU64,
    ownership_violations: AtomicU64,
    release_failures: AtomicU64,
}

/// Counters shared by every clone of a strategy
#[derive(Clone, Default)]
pub struct StrategyStats {
    counters: Arc<Counters>,
}

impl StrategyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lock attempt found the key taken
    pub fn record_poll(&self) {
        self.counters.lock_polls.fetch_add(1, Ordering::Relaxed);
    }

    /// A waiter was woken by a release notification
    pub fn record_wakeup(&self) {
        self.counters.wakeups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extension(&self) {
        self.counters.lease_extensions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict(&self) {
        self.counters.version_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ownership_violation(&self) {
        self.counters
            .ownership_violations
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_release_failure(&self) {
        self.counters.release_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let c = &self.counters;
        StatsSnapshot {
            lock_polls: c.lock_polls.load(Ordering::Relaxed),
            wakeups: c.wakeups.load(Ordering::Relaxed),
            lease_extensions: c.lease_extensions.load(Ordering::Relaxed),
            version_conflicts: c.version_conflicts.load(Ordering::Relaxed),
            ownership_violations: c.ownership_violations.load(Ordering::Relaxed),
            release_failures: c.release_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`StrategyStats`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub lock_polls: u64,
    pub wakeups: u64,
    pub lease_extensions: u64,
    pub version_conflicts: u64,
    pub ownership_violations: u64,
    pub release_failures: u64,
}

impl StatsSnapshot {
    /// Counts accumulated after `earlier` was taken
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            lock_polls: self.lock_polls.saturating_sub(earlier.lock_polls),
            wakeups: self.wakeups.saturating_sub(earlier.wakeups),
            lease_extensions: self.lease_extensions.saturating_sub(earlier.lease_extensions),
            version_conflicts: self.version_conflicts.saturating_sub(earlier.version_conflicts),
            ownership_violations: self
                .ownership_violations
                .saturating_sub(earlier.ownership_violations),
            release_failures: self.release_failures.saturating_sub(earlier.release_failures),
        }
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
