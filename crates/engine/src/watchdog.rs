// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background lease renewal

use crate::stats::StrategyStats;
use sg_adapters::CoordinationStore;
use sg_core::Owner;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Renews one held lease until stopped.
///
/// Tied 1:1 to a lease: spawned right after acquisition, stopped at release.
/// If the holder dies the task is aborted with it and the TTL takes over.
pub struct Watchdog {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Watchdog {
    pub fn spawn<C: CoordinationStore>(
        coordination: C,
        key: String,
        owner: Owner,
        lease: Duration,
        every: Duration,
        stats: StrategyStats,
    ) -> Self {
        let (cancel, mut cancelled) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => {}
                }

                match coordination.extend_if_owner(&key, &owner, lease).await {
                    Ok(true) => {
                        stats.record_extension();
                        tracing::trace!(key = %key, %owner, "lease renewed");
                    }
                    Ok(false) => {
                        tracing::warn!(key = %key, %owner, "lease lost before renewal, watchdog stopping");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, %owner, error = %e, "lease renewal failed, watchdog stopping");
                        break;
                    }
                }
            }
        });

        Self {
            cancel: Some(cancel),
            handle,
        }
    }

    /// Whether the renewal task has ended on its own
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel renewal and wait for the task to exit
    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
