// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock owner tokens

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity written into a lock key while the lock is held.
///
/// Every acquisition gets a fresh owner, so a caller whose lease expired can
/// never release a lease that was since granted to someone else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates owner tokens
pub trait OwnerGen: Clone + Send + Sync + 'static {
    fn next(&self) -> Owner;
}

/// Random owner tokens for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidOwnerGen;

impl OwnerGen for UuidOwnerGen {
    fn next(&self) -> Owner {
        Owner(uuid::Uuid::new_v4().to_string())
    }
}

/// Predictable owner tokens for tests
#[derive(Clone, Debug)]
pub struct SequentialOwnerGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialOwnerGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialOwnerGen {
    fn default() -> Self {
        Self::new("owner")
    }
}

impl OwnerGen for SequentialOwnerGen {
    fn next(&self) -> Owner {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Owner(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
