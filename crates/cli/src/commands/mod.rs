// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod compare;
pub mod config;
pub mod trial;

use crate::error::SgError;
use anyhow::Result;
use clap::Args;
use sg_adapters::{
    MemoryCoordinationStore, MemoryResourceStore, SlowResourceStore, TracedCoordinationStore,
    TracedResourceStore,
};
use sg_core::{GuardConfig, ResourceId};
use sg_engine::{build_strategy, StockStrategy, StrategyKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Trial sizing shared by `trial` and `compare`
#[derive(Args, Clone, Debug)]
pub struct Sizing {
    /// Starting quantity of every resource
    #[arg(long, default_value_t = 100)]
    pub quantity: u64,

    /// Concurrent callers per resource
    #[arg(long, default_value_t = 100)]
    pub callers: usize,

    /// Units each caller adjusts by
    #[arg(long, default_value_t = 1)]
    pub amount: u64,

    /// Simulated store latency per read, in milliseconds
    #[arg(long, value_name = "MS")]
    pub hold_ms: Option<u64>,
}

impl Sizing {
    pub fn check(&self) -> Result<(), SgError> {
        if self.callers == 0 {
            return Err(SgError::invalid_sizing("--callers must be at least 1"));
        }
        if self.amount == 0 {
            return Err(SgError::invalid_sizing("--amount must be at least 1"));
        }
        Ok(())
    }
}

pub fn load_config(path: Option<&Path>) -> Result<GuardConfig> {
    match path {
        None => Ok(GuardConfig::default()),
        Some(path) => {
            let config =
                GuardConfig::load(path).map_err(|e| SgError::config_rejected(path, e))?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
    }
}

/// Resource ids for a trial over `count` resources
pub fn resource_ids(count: usize) -> Vec<ResourceId> {
    (1..=count)
        .map(|i| ResourceId::new(format!("sku-{i}")))
        .collect()
}

/// Fresh in-memory stores seeded with `quantity` for each id
pub fn build(
    kind: StrategyKind,
    config: &GuardConfig,
    ids: &[ResourceId],
    sizing: &Sizing,
) -> Arc<dyn StockStrategy> {
    let records = MemoryResourceStore::new();
    for id in ids {
        records.seed(id.clone(), sizing.quantity);
    }
    let coordination = TracedCoordinationStore::new(MemoryCoordinationStore::new());

    match sizing.hold_ms {
        Some(ms) if ms > 0 => build_strategy(
            kind,
            config,
            TracedResourceStore::new(SlowResourceStore::new(records, Duration::from_millis(ms))),
            coordination,
        ),
        _ => build_strategy(kind, config, TracedResourceStore::new(records), coordination),
    }
}
