//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    Project::empty()
        .sg()
        .args(&["--help"])
        .passes()
        .stdout_has("trial")
        .stdout_has("compare")
        .stdout_has("config");
}

#[test]
fn trial_help_documents_sizing_flags() {
    Project::empty()
        .sg()
        .args(&["trial", "--help"])
        .passes()
        .stdout_has("--strategy")
        .stdout_has("--callers")
        .stdout_has("--hold-ms")
        .stdout_has("--increase");
}

#[test]
fn version_prints_package_version() {
    Project::empty()
        .sg()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
