// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single requested change to a stock record

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Which way an adjustment moves the quantity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Decrease,
    Increase,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Decrease => write!(f, "decrease"),
            Direction::Increase => write!(f, "increase"),
        }
    }
}

/// Identity of the caller, carried into structured logs
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Default for CallerId {
    fn default() -> Self {
        Self("anonymous".to_string())
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One call against a strategy
#[derive(Clone, Debug)]
pub struct Adjustment {
    pub id: ResourceId,
    pub direction: Direction,
    pub amount: u64,
    pub caller: CallerId,
    /// Overall bound on the call, lock waits and retry sleeps included
    pub deadline: Option<Instant>,
}

impl Adjustment {
    pub fn decrease(id: impl Into<ResourceId>, amount: u64) -> Self {
        Self::new(id, Direction::Decrease, amount)
    }

    pub fn increase(id: impl Into<ResourceId>, amount: u64) -> Self {
        Self::new(id, Direction::Increase, amount)
    }

    pub fn new(id: impl Into<ResourceId>, direction: Direction, amount: u64) -> Self {
        Self {
            id: id.into(),
            direction,
            amount,
            caller: CallerId::default(),
            deadline: None,
        }
    }

    pub fn with_caller(mut self, caller: CallerId) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Time left before the deadline; `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Whether waiting `wait` from now would overrun the deadline
    pub fn would_overrun(&self, wait: Duration) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() + wait > deadline)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
#[path = "adjustment_tests.rs"]
mod tests;
