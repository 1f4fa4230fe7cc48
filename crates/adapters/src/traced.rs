// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrappers for consistent observability

use crate::coordination::{CoordinationError, CoordinationStore, Subscription};
use crate::store::{ResourceStore, StoreError};
use async_trait::async_trait;
use sg_core::{Owner, Record, ResourceId};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Wrapper that adds tracing to any ResourceStore
#[derive(Clone)]
pub struct TracedResourceStore<S> {
    inner: S,
}

impl<S> TracedResourceStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for TracedResourceStore<S> {
    async fn read(&self, id: &ResourceId) -> Result<Record, StoreError> {
        let span = tracing::debug_span!("store.read", resource_id = %id);
        let result = self.inner.read(id).instrument(span.clone()).await;

        let _guard = span.enter();
        match &result {
            Ok(record) => tracing::trace!(quantity = record.quantity, version = record.version, "read"),
            Err(e) => tracing::warn!(error = %e, "read failed"),
        }
        result
    }

    async fn write_if_version_matches(
        &self,
        id: &ResourceId,
        new_quantity: u64,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let span = tracing::debug_span!(
            "store.write_if_version_matches",
            resource_id = %id,
            new_quantity,
            expected_version
        );
        let start = Instant::now();
        let result = self
            .inner
            .write_if_version_matches(id, new_quantity, expected_version)
            .instrument(span.clone())
            .await;
        let elapsed = start.elapsed();

        let _guard = span.enter();
        match &result {
            Ok(true) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "committed"),
            Ok(false) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "version mismatch"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "conditional write failed"
            ),
        }
        result
    }

    async fn write_unconditional(
        &self,
        id: &ResourceId,
        new_quantity: u64,
    ) -> Result<Record, StoreError> {
        let span = tracing::debug_span!("store.write_unconditional", resource_id = %id, new_quantity);
        let start = Instant::now();
        let result = self
            .inner
            .write_unconditional(id, new_quantity)
            .instrument(span.clone())
            .await;
        let elapsed = start.elapsed();

        let _guard = span.enter();
        match &result {
            Ok(record) => tracing::debug!(
                version = record.version,
                elapsed_ms = elapsed.as_millis() as u64,
                "committed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "write failed"
            ),
        }
        result
    }
}

/// Wrapper that adds tracing to any CoordinationStore
#[derive(Clone)]
pub struct TracedCoordinationStore<S> {
    inner: S,
}

impl<S> TracedCoordinationStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: CoordinationStore> CoordinationStore for TracedCoordinationStore<S> {
    async fn set_if_absent(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        let span = tracing::trace_span!(
            "coordination.set_if_absent",
            key,
            %owner,
            ttl_ms = ttl.as_millis() as u64
        );
        let result = self
            .inner
            .set_if_absent(key, owner, ttl)
            .instrument(span.clone())
            .await;

        let _guard = span.enter();
        match &result {
            Ok(granted) => tracing::trace!(granted, "set_if_absent"),
            Err(e) => tracing::error!(error = %e, "set_if_absent failed"),
        }
        result
    }

    async fn get(&self, key: &str) -> Result<Option<Owner>, CoordinationError> {
        let result = self.inner.get(key).await;
        tracing::trace!(key, owner = ?result.as_ref().ok(), "get");
        result
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CoordinationError> {
        self.inner.ttl(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CoordinationError> {
        let span = tracing::debug_span!("coordination.delete", key);
        let result = self.inner.delete(key).instrument(span.clone()).await;

        let _guard = span.enter();
        match &result {
            Ok(removed) => tracing::debug!(removed, "deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        }
        result
    }

    async fn delete_if_owner(&self, key: &str, owner: &Owner) -> Result<bool, CoordinationError> {
        let span = tracing::debug_span!("coordination.delete_if_owner", key, %owner);
        let result = self
            .inner
            .delete_if_owner(key, owner)
            .instrument(span.clone())
            .await;

        let _guard = span.enter();
        match &result {
            Ok(removed) => tracing::debug!(removed, "delete_if_owner"),
            // Release failing is survivable, the TTL clears the key
            Err(e) => tracing::warn!(error = %e, "delete_if_owner failed"),
        }
        result
    }

    async fn extend_if_owner(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError> {
        let result = self.inner.extend_if_owner(key, owner, ttl).await;
        match &result {
            Ok(extended) => tracing::trace!(key, %owner, extended, "extend_if_owner"),
            Err(e) => tracing::warn!(key, %owner, error = %e, "extend_if_owner failed"),
        }
        result
    }

    async fn publish(&self, channel: &str) -> Result<usize, CoordinationError> {
        let result = self.inner.publish(channel).await;
        match &result {
            Ok(delivered) => tracing::trace!(channel, delivered, "publish"),
            Err(e) => tracing::warn!(channel, error = %e, "publish failed"),
        }
        result
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, CoordinationError> {
        let result = self.inner.subscribe(channel).await;
        if let Err(e) = &result {
            tracing::warn!(channel, error = %e, "subscribe failed");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
