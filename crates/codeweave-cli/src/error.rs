//! Errors surfaced by the CLI.

use std::{io, ops::Range};

use thiserror::Error;

use codeweave::CodeweaveError;

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The scenario file is not valid TOML or does not match the schema.
    #[error("Invalid scenario: {message}")]
    ScenarioSyntax {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },

    /// The scenario parsed but references unknown entities.
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error(transparent)]
    Codeweave(#[from] CodeweaveError),
}

impl CliError {
    /// Returns true if the run stopped because it was cancelled.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Codeweave(err) if err.is_cancellation())
    }

    /// The process exit status for this error.
    ///
    /// Cancellation exits with the conventional status for SIGINT.
    pub fn exit_code(&self) -> i32 {
        if self.is_cancellation() { 130 } else { 1 }
    }
}
