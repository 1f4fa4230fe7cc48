// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sg-core: Core types for the stockguard concurrency strategies
//!
//! This crate provides:
//! - Versioned stock records and the adjustments applied to them
//! - A pure lease state machine modelling a TTL'd lock key
//! - Retry policies and an explicit retry combinator
//! - The shared failure taxonomy and TOML configuration

pub mod adjustment;
pub mod backoff;
pub mod clock;
pub mod config;
pub mod error;
pub mod lease;
pub mod owner;
pub mod resource;
pub mod retry;

// Re-exports
pub use adjustment::{Adjustment, CallerId, Direction};
pub use backoff::{
    AttemptContext, BackoffKind, JitterSource, RandomJitter, RetryPolicy, ScriptedJitter,
};
pub use clock::{Clock, FakeClock, SystemClock, TokioClock};
pub use config::{ConfigError, GuardConfig, PubSubConfig, ReleaseMode, SpinConfig};
pub use error::{FailureKind, StockError};
pub use lease::{Lease, LeaseEvent, LeaseInput, LeaseState};
pub use owner::{Owner, OwnerGen, SequentialOwnerGen, UuidOwnerGen};
pub use resource::{Record, ResourceId};
pub use retry::{retry, RetryError};
