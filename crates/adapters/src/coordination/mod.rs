// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock keys and release notifications
//!
//! The coordination store is the shared place lock strategies keep
//! `lock:{id} -> owner` entries with a TTL, plus a publish/subscribe channel
//! used to wake waiters when a key is released.

mod memory;

pub use memory::{Grant, MemoryCoordinationStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FlakyCoordinationStore;

use async_trait::async_trait;
use sg_core::{Owner, StockError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors from the coordination store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    #[error("coordination store unavailable: {0}")]
    Unavailable(String),
}

impl From<CoordinationError> for StockError {
    fn from(err: CoordinationError) -> Self {
        match err {
            CoordinationError::Unavailable(msg) => StockError::CoordinationUnavailable(msg),
        }
    }
}

/// Key/value store with TTLs and wake-up channels.
///
/// `set_if_absent`, `delete_if_owner` and `extend_if_owner` must each be
/// atomic on the store side.
#[async_trait]
pub trait CoordinationStore: Clone + Send + Sync + 'static {
    /// Store `owner` under `key` with `ttl` unless a live value already exists
    async fn set_if_absent(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError>;

    /// Live owner stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Owner>, CoordinationError>;

    /// Remaining time to live of `key`
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CoordinationError>;

    /// Remove `key` whoever holds it. Returns whether a live value was removed.
    async fn delete(&self, key: &str) -> Result<bool, CoordinationError>;

    /// Remove `key` only if it still holds `owner`
    async fn delete_if_owner(&self, key: &str, owner: &Owner) -> Result<bool, CoordinationError>;

    /// Reset the TTL of `key` only if it still holds `owner`
    async fn extend_if_owner(
        &self,
        key: &str,
        owner: &Owner,
        ttl: Duration,
    ) -> Result<bool, CoordinationError>;

    /// Wake every current subscriber of `channel`. Returns how many were listening.
    async fn publish(&self, channel: &str) -> Result<usize, CoordinationError>;

    /// Start listening on `channel`; only publishes after this call are seen
    async fn subscribe(&self, channel: &str) -> Result<Subscription, CoordinationError>;
}

/// Receiving end of a release channel
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<()>,
}

impl Subscription {
    pub fn new(receiver: broadcast::Receiver<()>) -> Self {
        Self { receiver }
    }

    /// Resolve on the next publish.
    ///
    /// Missed messages and a closed channel also resolve: a wake only ever
    /// means "try again", so a spurious one costs a single acquisition attempt.
    pub async fn wait(&mut self) {
        match self.receiver.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("release channel closed");
            }
        }
    }
}
