// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Stock adjustment strategies and the trial harness that races them

mod error;
mod guard;
mod harness;
mod local;
mod optimistic;
mod pubsub;
mod section;
mod spin;
mod stats;
mod strategy;
mod watchdog;

pub use error::{HarnessError, ParseStrategyError};
pub use guard::{LeaseGuard, ReleaseOutcome};
pub use harness::{run_concurrent_trial, run_trial, TrialPlan, TrialReport, TrialTarget};
pub use local::LocalMutexStrategy;
pub use optimistic::OptimisticStrategy;
pub use pubsub::PubSubLockStrategy;
pub use spin::SpinLockStrategy;
pub use stats::{StatsSnapshot, StrategyStats};
pub use strategy::{build_strategy, StockStrategy, StrategyKind};
pub use watchdog::Watchdog;
