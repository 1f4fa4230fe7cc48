// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped ownership of a lock key

use crate::stats::StrategyStats;
use crate::watchdog::Watchdog;
use sg_adapters::CoordinationStore;
use sg_core::{Owner, ReleaseMode};

/// What happened when a held key was given back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    /// The key had expired or belonged to someone else by then
    NotOwner,
    /// The store could not be reached; the TTL clears the key
    Failed,
}

/// A held lock key.
///
/// Call [`LeaseGuard::release`] on every path out of the critical section.
/// A guard dropped without it (a panic or a cancelled future) hands the
/// release to the runtime instead.
pub struct LeaseGuard<C: CoordinationStore> {
    coordination: C,
    key: String,
    owner: Owner,
    mode: ReleaseMode,
    /// Channel to announce the release on, for waiters that subscribed
    notify: Option<String>,
    watchdog: Option<Watchdog>,
    stats: StrategyStats,
    released: bool,
}

impl<C: CoordinationStore> LeaseGuard<C> {
    pub fn new(
        coordination: C,
        key: String,
        owner: Owner,
        mode: ReleaseMode,
        stats: StrategyStats,
    ) -> Self {
        Self {
            coordination,
            key,
            owner,
            mode,
            notify: None,
            watchdog: None,
            stats,
            released: false,
        }
    }

    pub fn with_notify(mut self, channel: String) -> Self {
        self.notify = Some(channel);
        self
    }

    pub fn with_watchdog(mut self, watchdog: Watchdog) -> Self {
        self.watchdog = Some(watchdog);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Stop renewal, clear the key if still ours, then wake any waiters
    pub async fn release(mut self) -> ReleaseOutcome {
        self.released = true;
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.stop().await;
        }
        release_key(
            &self.coordination,
            &self.key,
            &self.owner,
            self.mode,
            self.notify.as_deref(),
            &self.stats,
        )
        .await
    }
}

impl<C: CoordinationStore> Drop for LeaseGuard<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Dropping the watchdog aborts renewal
        self.watchdog.take();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(key = %self.key, owner = %self.owner, "guard dropped outside a runtime, leaving key to expire");
            return;
        };
        let coordination = self.coordination.clone();
        let key = std::mem::take(&mut self.key);
        let owner = self.owner.clone();
        let mode = self.mode;
        let notify = self.notify.take();
        let stats = self.stats.clone();
        tracing::debug!(key = %key, %owner, "guard dropped while held, releasing in background");
        runtime.spawn(async move {
            release_key(&coordination, &key, &owner, mode, notify.as_deref(), &stats).await;
        });
    }
}

async fn release_key<C: CoordinationStore>(
    coordination: &C,
    key: &str,
    owner: &Owner,
    mode: ReleaseMode,
    notify: Option<&str>,
    stats: &StrategyStats,
) -> ReleaseOutcome {
    let cleared = match mode {
        ReleaseMode::Atomic => coordination.delete_if_owner(key, owner).await,
        ReleaseMode::ReadThenDelete => match coordination.get(key).await {
            // The key can expire and be re-granted between this read and the delete
            Ok(Some(current)) if current == *owner => coordination.delete(key).await,
            Ok(_) => Ok(false),
            Err(e) => Err(e),
        },
    };

    let outcome = match cleared {
        Ok(true) => {
            tracing::debug!(key, %owner, "lock released");
            ReleaseOutcome::Released
        }
        Ok(false) => {
            stats.record_ownership_violation();
            tracing::warn!(key, %owner, "lock no longer owned at release");
            ReleaseOutcome::NotOwner
        }
        Err(e) => {
            stats.record_release_failure();
            tracing::warn!(key, %owner, error = %e, "lock release failed, key left to expire");
            ReleaseOutcome::Failed
        }
    };

    if let Some(channel) = notify {
        if let Err(e) = coordination.publish(channel).await {
            tracing::warn!(channel, error = %e, "release notification failed");
        }
    }
    outcome
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
