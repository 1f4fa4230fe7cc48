// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-injecting coordination store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CoordinationError, CoordinationStore, Subscription};
use async_trait::async_trait;
use sg_core::Owner;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Coordination store that can be taken offline
#[derive(Clone)]
pub struct FlakyCoordinationStore<S> {
    inner: S,
    failures: Arc<AtomicU32>,
    offline: Arc<AtomicBool>,
    extend_offline: Arc<AtomicBool>,
}

impl<S> FlakyCoordinationStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failures: Arc::new(AtomicU32::new(0)),
            offline: Arc::new(AtomicBool::new(false)),
            extend_offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next `n` calls fail
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Fail every call until turned back on
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail lease extensions only
    pub fn set_extend_offline(&self, offline: bool) {
        self.extend_offline.store(offline, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self) -> Result<(), CoordinationError> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected || self.offline.load(Ordering::SeqCst) {
            return Err(CoordinationError::Unavailable("injected fault".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: CoordinationStore> CoordinationStore for FlakyCoordinationStore<S> {
    async fn set_if_absent(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        self.check()?;
        self.inner.set_if_absent(key, owner, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<Owner>, CoordinationError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CoordinationError> {
        self.check()?;
        self.inner.ttl(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CoordinationError> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn delete_if_owner(&self, key: &str, owner: &Owner) -> Result<bool, CoordinationError> {
        self.check()?;
        self.inner.delete_if_owner(key, owner).await
    }

    async fn extend_if_owner(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        self.check()?;
        if self.extend_offline.load(Ordering::SeqCst) {
            return Err(CoordinationError::Unavailable("injected fault".to_string()));
        }
        self.inner.extend_if_owner(key, owner, ttl).await
    }

    async fn publish(&self, channel: &str) -> Result<usize, CoordinationError> {
        self.check()?;
        self.inner.publish(channel).await
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, CoordinationError> {
        self.check()?;
        self.inner.subscribe(channel).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
