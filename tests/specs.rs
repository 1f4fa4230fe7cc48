//! Behavioral specifications for the sg CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// trial/
#[path = "specs/trial/decrease.rs"]
mod trial_decrease;
#[path = "specs/trial/increase.rs"]
mod trial_increase;
#[path = "specs/trial/output.rs"]
mod trial_output;

// compare, config
#[path = "specs/compare.rs"]
mod compare;
#[path = "specs/config.rs"]
mod config;
