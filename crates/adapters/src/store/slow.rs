// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record store with simulated read latency

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use sg_core::{Record, ResourceId};
use std::time::Duration;

/// Store whose reads take time, widening the window between a caller's read
/// and its write so concurrent callers actually interleave
#[derive(Clone)]
pub struct SlowResourceStore<S> {
    inner: S,
    read_latency: Duration,
}

impl<S> SlowResourceStore<S> {
    pub fn new(inner: S, read_latency: Duration) -> Self {
        Self {
            inner,
            read_latency,
        }
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for SlowResourceStore<S> {
    async fn read(&self, id: &ResourceId) -> Result<Record, StoreError> {
        let record = self.inner.read(id).await;
        tokio::time::sleep(self.read_latency).await;
        record
    }

    async fn write_if_version_matches(
        &self,
        id: &ResourceId,
        new_quantity: u64,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        self.inner
            .write_if_version_matches(id, new_quantity, expected_version)
            .await
    }

    async fn write_unconditional(
        &self,
        id: &ResourceId,
        new_quantity: u64,
    ) -> Result<Record, StoreError> {
        self.inner.write_unconditional(id, new_quantity).await
    }
}

#[cfg(test)]
#[path = "slow_tests.rs"]
mod tests;
