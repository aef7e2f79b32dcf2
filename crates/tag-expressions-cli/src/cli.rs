//! Command-line arguments for `tagx`.

use clap::{Parser, Subcommand};

use crate::config::{LogLevel, OutputFormat};

/// Evaluate and format boolean tag expressions.
#[derive(Parser, Debug)]
#[command(name = "tagx", version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Output format (text, json).
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations on a single tag expression.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Evaluate an expression against a set of tags.
    ///
    /// Exits with status 0 when the tags match and 1 when they do not.
    Eval {
        /// Tag expression, for example `@fast and not @wip`.
        expression: String,
        /// Tag carried by the item under test; repeat for several tags.
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Print the canonical, fully parenthesised form of an expression.
    Format {
        /// Tag expression to normalise.
        expression: String,
    },
    /// Print the tokens an expression splits into.
    Tokens {
        /// Tag expression to tokenise.
        expression: String,
    },
}
