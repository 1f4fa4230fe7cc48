// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stock records and their identifiers

use crate::adjustment::Direction;
use crate::error::StockError;
use serde::{Deserialize, Serialize};

/// Identifier of a stock record
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A versioned stock counter.
///
/// `quantity` is unsigned so a negative count cannot be represented at all.
/// Every committed write produces the successor with `version + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: ResourceId,
    pub quantity: u64,
    pub version: u64,
}

impl Record {
    /// Initial state of a freshly created record
    pub fn seed(id: impl Into<ResourceId>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            quantity,
            version: 0,
        }
    }

    /// Quantity after applying `amount` in `direction`, validated.
    pub fn adjusted_quantity(&self, direction: Direction, amount: u64) -> Result<u64, StockError> {
        if amount == 0 {
            return Err(StockError::InvalidAmount {
                id: self.id.clone(),
            });
        }
        match direction {
            Direction::Decrease => {
                self.quantity
                    .checked_sub(amount)
                    .ok_or_else(|| StockError::InsufficientStock {
                        id: self.id.clone(),
                        available: self.quantity,
                        requested: amount,
                    })
            }
            Direction::Increase => {
                self.quantity
                    .checked_add(amount)
                    .ok_or_else(|| StockError::QuantityOverflow {
                        id: self.id.clone(),
                    })
            }
        }
    }

    /// The record a successful write of `quantity` would commit
    pub fn successor(&self, quantity: u64) -> Record {
        Record {
            id: self.id.clone(),
            quantity,
            version: self.version + 1,
        }
    }

    /// Validate and build the next committed state in one step
    pub fn apply(&self, direction: Direction, amount: u64) -> Result<Record, StockError> {
        let quantity = self.adjusted_quantity(direction, amount)?;
        Ok(self.successor(quantity))
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
