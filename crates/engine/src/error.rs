// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the strategy engine

use thiserror::Error;

/// Errors from running a trial (individual caller failures are not errors here)
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("caller task failed: {0}")]
    Caller(#[from] tokio::task::JoinError),
    #[error("trial needs at least one caller")]
    NoCallers,
    #[error("final state unavailable: {0}")]
    FinalState(#[from] sg_core::StockError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy: {0} (expected local, spin, pubsub or optimistic)")]
pub struct ParseStrategyError(pub String);
