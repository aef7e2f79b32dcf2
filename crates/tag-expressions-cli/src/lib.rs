//! Command-line front end for tag expressions.
//!
//! The `tagx` binary feeds an expression and a tag list into the
//! `tag-expressions` library and prints booleans or canonical strings. The
//! library crate exposes the pieces so they can be exercised without spawning
//! a process.
//!
//! # Configuration
//!
//! - `TAGX_LOG_LEVEL`: Log verbosity (trace, debug, info, warn, error)
//! - `TAGX_OUTPUT`: Output format (text, json)
//!
//! Command-line flags override both.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
