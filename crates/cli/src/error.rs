// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use sg_core::ConfigError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct SgError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SgError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A configuration file could not be read, parsed or validated
    pub fn config_rejected(path: &Path, err: ConfigError) -> Self {
        let base = SgError::new(format!("Cannot use config '{}'", path.display()))
            .with_context(err.to_string());
        let base = match &err {
            ConfigError::Io { .. } => {
                base.with_suggestion("Check that the file exists and is readable")
            }
            ConfigError::Parse(_) => base
                .with_suggestion("Durations are written like \"50ms\" or \"3s\"")
                .with_suggestion("Print the defaults as a starting point: sg config"),
            ConfigError::Invalid(_) => {
                base.with_suggestion("Print the defaults as a starting point: sg config")
            }
        };
        base.with_source(err)
    }

    /// Trial dimensions that can never produce a meaningful run
    pub fn invalid_sizing(problem: &str) -> Self {
        SgError::new(format!("Invalid trial size: {problem}"))
            .with_suggestion("See the accepted ranges: sg trial --help")
    }
}

impl fmt::Display for SgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for SgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
