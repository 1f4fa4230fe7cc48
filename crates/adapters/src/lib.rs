// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Stores the strategies coordinate through

pub mod coordination;
pub mod store;
pub mod traced;

pub use coordination::{
    CoordinationError, CoordinationStore, Grant, MemoryCoordinationStore, Subscription,
};
pub use store::{MemoryResourceStore, ResourceStore, SlowResourceStore, StoreError};
pub use traced::{TracedCoordinationStore, TracedResourceStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use coordination::FlakyCoordinationStore;
#[cfg(any(test, feature = "test-support"))]
pub use store::{FlakyResourceStore, StoreCall};
