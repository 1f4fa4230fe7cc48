// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process record store

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use sg_core::{Record, ResourceId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Row {
    record: Record,
    /// Every version committed since the row was seeded, in commit order
    committed: Vec<u64>,
}

/// Record store backed by a shared map
#[derive(Clone, Default)]
pub struct MemoryResourceStore {
    rows: Arc<Mutex<HashMap<ResourceId, Row>>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or reset) a record at version 0
    pub fn seed(&self, id: impl Into<ResourceId>, quantity: u64) -> Record {
        let record = Record::seed(id, quantity);
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).insert(
            record.id.clone(),
            Row {
                record: record.clone(),
                committed: Vec::new(),
            },
        );
        record
    }

    /// Current record without going through the async interface
    pub fn snapshot(&self, id: &ResourceId) -> Option<Record> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|row| row.record.clone())
    }

    /// Versions committed for `id`, in the order the store accepted them
    pub fn committed_versions(&self, id: &ResourceId) -> Vec<u64> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|row| row.committed.clone())
            .unwrap_or_default()
    }

    fn commit(row: &mut Row, new_quantity: u64) -> Record {
        row.record = row.record.successor(new_quantity);
        row.committed.push(row.record.version);
        row.record.clone()
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn read(&self, id: &ResourceId) -> Result<Record, StoreError> {
        self.snapshot(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn write_if_version_matches(
        &self,
        id: &ResourceId,
        new_quantity: u64,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if row.record.version != expected_version {
            return Ok(false);
        }
        Self::commit(row, new_quantity);
        Ok(true)
    }

    async fn write_unconditional(
        &self,
        id: &ResourceId,
        new_quantity: u64,
    ) -> Result<Record, StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(Self::commit(row, new_quantity))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
