// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-injecting record stores for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use sg_core::{Record, ResourceId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Read(ResourceId),
    WriteIfVersionMatches {
        id: ResourceId,
        new_quantity: u64,
        expected_version: u64,
    },
    WriteUnconditional {
        id: ResourceId,
        new_quantity: u64,
    },
}

/// Store that fails a configurable number of upcoming calls and records the rest
#[derive(Clone)]
pub struct FlakyResourceStore<S> {
    inner: S,
    failures: Arc<AtomicU32>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl<S> FlakyResourceStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failures: Arc::new(AtomicU32::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next `n` calls fail with `Unavailable`
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Calls that reached the inner store
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check(&self, call: StoreCall) -> Result<(), StoreError> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::Unavailable("injected fault".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for FlakyResourceStore<S> {
    async fn read(&self, id: &ResourceId) -> Result<Record, StoreError> {
        self.check(StoreCall::Read(id.clone()))?;
        self.inner.read(id).await
    }

    async fn write_if_version_matches(
        &self,
        id: &ResourceId,
        new_quantity: u64,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        self.check(StoreCall::WriteIfVersionMatches {
            id: id.clone(),
            new_quantity,
            expected_version,
        })?;
        self.inner
            .write_if_version_matches(id, new_quantity, expected_version)
            .await
    }

    async fn write_unconditional(
        &self,
        id: &ResourceId,
        new_quantity: u64,
    ) -> Result<Record, StoreError> {
        self.check(StoreCall::WriteUnconditional {
            id: id.clone(),
            new_quantity,
        })?;
        self.inner.write_unconditional(id, new_quantity).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
