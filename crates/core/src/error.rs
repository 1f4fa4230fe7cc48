// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure taxonomy shared by every strategy

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors a stock adjustment can end with.
///
/// Callers either get a committed record or exactly one of these; no variant
/// leaves a partially applied write behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),
    #[error("insufficient stock for {id}: available {available}, requested {requested}")]
    InsufficientStock {
        id: ResourceId,
        available: u64,
        requested: u64,
    },
    #[error("adjustment amount must be positive for {id}")]
    InvalidAmount { id: ResourceId },
    #[error("quantity overflow for {id}")]
    QuantityOverflow { id: ResourceId },
    #[error("lock acquisition timed out for {key} after {attempts} attempts ({waited:?})")]
    LockAcquisitionTimeout {
        key: String,
        attempts: u32,
        waited: Duration,
    },
    #[error("concurrency exhausted for {id} after {attempts} attempts")]
    ConcurrencyExhausted { id: ResourceId, attempts: u32 },
    #[error("deadline exceeded for {id} after {waited:?}")]
    DeadlineExceeded { id: ResourceId, waited: Duration },
    #[error("coordination store unavailable: {0}")]
    CoordinationUnavailable(String),
    #[error("resource store unavailable: {0}")]
    StoreUnavailable(String),
}

impl StockError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StockError::ResourceNotFound(_) => FailureKind::ResourceNotFound,
            StockError::InsufficientStock { .. } => FailureKind::InsufficientStock,
            StockError::InvalidAmount { .. } => FailureKind::InvalidAmount,
            StockError::QuantityOverflow { .. } => FailureKind::QuantityOverflow,
            StockError::LockAcquisitionTimeout { .. } => FailureKind::LockAcquisitionTimeout,
            StockError::ConcurrencyExhausted { .. } => FailureKind::ConcurrencyExhausted,
            StockError::DeadlineExceeded { .. } => FailureKind::DeadlineExceeded,
            StockError::CoordinationUnavailable(_) => FailureKind::CoordinationUnavailable,
            StockError::StoreUnavailable(_) => FailureKind::StoreUnavailable,
        }
    }

    /// Business rule failures, as opposed to coordination or infrastructure ones
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StockError::InsufficientStock { .. }
                | StockError::InvalidAmount { .. }
                | StockError::QuantityOverflow { .. }
        )
    }
}

/// Discriminant of [`StockError`], used to bucket trial failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ResourceNotFound,
    InsufficientStock,
    InvalidAmount,
    QuantityOverflow,
    LockAcquisitionTimeout,
    ConcurrencyExhausted,
    DeadlineExceeded,
    CoordinationUnavailable,
    StoreUnavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ResourceNotFound => "resource_not_found",
            FailureKind::InsufficientStock => "insufficient_stock",
            FailureKind::InvalidAmount => "invalid_amount",
            FailureKind::QuantityOverflow => "quantity_overflow",
            FailureKind::LockAcquisitionTimeout => "lock_acquisition_timeout",
            FailureKind::ConcurrencyExhausted => "concurrency_exhausted",
            FailureKind::DeadlineExceeded => "deadline_exceeded",
            FailureKind::CoordinationUnavailable => "coordination_unavailable",
            FailureKind::StoreUnavailable => "store_unavailable",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
