// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sg trial --strategy <kind>` - Run concurrent callers against one strategy

use super::{build, resource_ids, Sizing};
use crate::error::SgError;
use crate::output::{self, OutputFormat, TrialSummary};
use anyhow::Result;
use clap::Args;
use sg_core::{Direction, GuardConfig};
use sg_engine::{run_trial, StrategyKind, TrialPlan};
use std::time::Duration;

#[derive(Args)]
pub struct TrialArgs {
    /// Strategy to run: local, spin, pubsub or optimistic
    #[arg(long, short)]
    pub strategy: StrategyKind,

    #[command(flatten)]
    pub sizing: Sizing,

    /// Number of independent resources, each with its own callers
    #[arg(long, default_value_t = 1)]
    pub resources: usize,

    /// Add stock instead of removing it
    #[arg(long)]
    pub increase: bool,

    /// Per-caller deadline in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(args: TrialArgs, config: &GuardConfig) -> Result<()> {
    args.sizing.check()?;
    if args.resources == 0 {
        return Err(SgError::invalid_sizing("--resources must be at least 1").into());
    }

    let ids = resource_ids(args.resources);
    let mut plan = TrialPlan::new(args.sizing.amount);
    for id in &ids {
        plan = plan.with_target(id.clone(), args.sizing.callers);
    }
    if args.increase {
        plan = plan.with_direction(Direction::Increase);
    }
    if let Some(ms) = args.timeout_ms {
        plan = plan.with_timeout(Duration::from_millis(ms));
    }

    let strategy = build(args.strategy, config, &ids, &args.sizing);
    let report = run_trial(strategy, &plan).await?;

    output::print(&TrialSummary(&report), OutputFormat::from_flag(args.json))
}
