// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned record storage

mod memory;
mod slow;

pub use memory::MemoryResourceStore;
pub use slow::SlowResourceStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FlakyResourceStore, StoreCall};

use async_trait::async_trait;
use sg_core::{Record, ResourceId, StockError};
use thiserror::Error;

/// Errors from record storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(ResourceId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for StockError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => StockError::ResourceNotFound(id),
            StoreError::Unavailable(msg) => StockError::StoreUnavailable(msg),
        }
    }
}

/// Holder of `{id, quantity, version}` rows.
///
/// Both write operations commit `version + 1` and are atomic with respect to
/// each other for a single id.
#[async_trait]
pub trait ResourceStore: Clone + Send + Sync + 'static {
    /// Current committed state of `id`
    async fn read(&self, id: &ResourceId) -> Result<Record, StoreError>;

    /// Commit `new_quantity` only if the stored version still equals
    /// `expected_version`. Returns `false` when another writer got there first.
    async fn write_if_version_matches(
        &self,
        id: &ResourceId,
        new_quantity: u64,
        expected_version: u64,
    ) -> Result<bool, StoreError>;

    /// Commit `new_quantity` regardless of the stored version
    async fn write_unconditional(
        &self,
        id: &ResourceId,
        new_quantity: u64,
    ) -> Result<Record, StoreError>;
}
