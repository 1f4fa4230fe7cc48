// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sg compare` - Run the same trial against every strategy

use super::{build, resource_ids, Sizing};
use crate::output::{self, CompareRow, OutputFormat};
use anyhow::Result;
use clap::Args;
use sg_core::GuardConfig;
use sg_engine::{run_trial, StrategyKind, TrialPlan};

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub sizing: Sizing,

    /// Print the rows as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(args: CompareArgs, config: &GuardConfig) -> Result<()> {
    args.sizing.check()?;

    let ids = resource_ids(1);
    let plan = TrialPlan::new(args.sizing.amount).with_target(ids[0].clone(), args.sizing.callers);

    // each strategy gets fresh stores so runs do not see each other's writes
    let mut rows = Vec::with_capacity(StrategyKind::ALL.len());
    for kind in StrategyKind::ALL {
        let strategy = build(kind, config, &ids, &args.sizing);
        let report = run_trial(strategy, &plan).await?;
        rows.push(CompareRow::from_report(&report));
    }

    output::print_list(CompareRow::HEADER, &rows, OutputFormat::from_flag(args.json))
}
