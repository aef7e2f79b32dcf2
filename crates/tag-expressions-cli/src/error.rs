//! Error types for the `tagx` command-line tool.

use tag_expressions::TagExpressionError;
use thiserror::Error;

/// Errors that can occur while configuring or running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The expression text could not be parsed.
    #[error(transparent)]
    Expression(#[from] TagExpressionError),

    /// Serialising JSON output failed.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
