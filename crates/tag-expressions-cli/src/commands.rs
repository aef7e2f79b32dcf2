//! Command implementations writing results to an output stream.

use std::io::Write;

use serde::Serialize;
use tag_expressions::{TagExpressionParser, parse};
use tracing::debug;

use crate::cli::Command;
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliError;

/// Result of a successful command, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed; for `eval`, the tags matched.
    Success,
    /// `eval` completed but the tags did not match.
    NoMatch,
}

impl Outcome {
    /// Process exit status for the outcome.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoMatch => 1,
        }
    }
}

#[derive(Serialize)]
struct Evaluation<'a> {
    expression: String,
    tags: &'a [String],
    result: bool,
}

#[derive(Serialize)]
struct Formatted<'a> {
    expression: &'a str,
    formatted: String,
}

/// Run `command` with `config`, writing results to `out`.
///
/// # Errors
///
/// Returns [`CliError::Expression`] when the expression is malformed and
/// [`CliError::Io`] or [`CliError::Json`] when output fails.
pub fn run<W: Write>(command: &Command, config: &CliConfig, out: &mut W) -> Result<Outcome, CliError> {
    match command {
        Command::Eval { expression, tags } => evaluate(expression, tags, config.output, out),
        Command::Format { expression } => format(expression, config.output, out),
        Command::Tokens { expression } => tokens(expression, config.output, out),
    }
}

/// Evaluate `expression` against `tags`.
///
/// # Errors
///
/// See [`run`].
pub fn evaluate<W: Write>(
    expression: &str,
    tags: &[String],
    output: OutputFormat,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let expr = parse(expression)?;
    let result = expr.evaluate(tags);
    debug!(expression = %expr, ?tags, result, "evaluated tag expression");
    match output {
        OutputFormat::Text => writeln!(out, "{result}")?,
        OutputFormat::Json => {
            let evaluation = Evaluation {
                expression: expr.to_string(),
                tags,
                result,
            };
            serde_json::to_writer(&mut *out, &evaluation)?;
            writeln!(out)?;
        }
    }
    Ok(if result {
        Outcome::Success
    } else {
        Outcome::NoMatch
    })
}

/// Print the canonical form of `expression`.
///
/// # Errors
///
/// See [`run`].
pub fn format<W: Write>(
    expression: &str,
    output: OutputFormat,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let formatted = parse(expression)?.to_string();
    match output {
        OutputFormat::Text => writeln!(out, "{formatted}")?,
        OutputFormat::Json => {
            serde_json::to_writer(
                &mut *out,
                &Formatted {
                    expression,
                    formatted,
                },
            )?;
            writeln!(out)?;
        }
    }
    Ok(Outcome::Success)
}

/// Print the tokens of `expression`.
///
/// # Errors
///
/// See [`run`].
pub fn tokens<W: Write>(
    expression: &str,
    output: OutputFormat,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let tokens = TagExpressionParser::tokenize(expression)?;
    debug!(count = tokens.len(), "tokenised tag expression");
    match output {
        OutputFormat::Text => {
            for token in &tokens {
                writeln!(out, "{token}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &tokens)?;
            writeln!(out)?;
        }
    }
    Ok(Outcome::Success)
}
