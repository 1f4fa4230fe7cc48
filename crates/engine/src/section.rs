// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-validate-write unit of work run while a lock is held

use sg_adapters::ResourceStore;
use sg_core::{Adjustment, Record, StockError};

/// Reject adjustments that can never succeed before any lock is taken
pub(crate) fn check_amount(adjustment: &Adjustment) -> Result<(), StockError> {
    if adjustment.amount == 0 {
        return Err(StockError::InvalidAmount {
            id: adjustment.id.clone(),
        });
    }
    Ok(())
}

/// Apply `adjustment` against `store` as one unit of work.
///
/// The caller must already exclude other writers of the same record; the
/// write is unconditional.
pub(crate) async fn run_section<S: ResourceStore>(
    store: &S,
    adjustment: &Adjustment,
) -> Result<Record, StockError> {
    let record = store.read(&adjustment.id).await?;
    let quantity = record.adjusted_quantity(adjustment.direction, adjustment.amount)?;
    let committed = store.write_unconditional(&adjustment.id, quantity).await?;
    tracing::debug!(
        caller_id = %adjustment.caller,
        resource_id = %adjustment.id,
        quantity = committed.quantity,
        version = committed.version,
        "committed"
    );
    Ok(committed)
}

#[cfg(test)]
#[path = "section_tests.rs"]
mod tests;
