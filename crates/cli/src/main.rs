// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sg - race stock adjustment strategies against each other

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{compare, config, trial};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::SgError;

#[derive(Parser)]
#[command(
    name = "sg",
    version,
    about = "Stockguard - compare concurrency strategies for stock counters"
)]
struct Cli {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run concurrent callers against one strategy
    Trial(trial::TrialArgs),
    /// Run the same trial against every strategy
    Compare(compare::CompareArgs),
    /// Print the effective configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SgError>() {
                Some(friendly) => eprint!("{friendly}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Trial(args) => trial::handle(args, &config).await,
        Commands::Compare(args) => compare::handle(args, &config).await,
        Commands::Config(args) => config::handle(args, &config),
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
