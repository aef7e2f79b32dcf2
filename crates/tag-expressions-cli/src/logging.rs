//! Structured logging with environment variable configuration.
//!
//! Logs are written to stderr so stdout carries only command results.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.log_level.as_level_filter().into())
        .parse_lossy("")
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level` (parsed into `config.log_level`)
/// 2. `TAGX_LOG_LEVEL` (parsed into `config.log_level`)
/// 3. Default configuration value
///
/// Records emitted through the `log` facade by the expression library are
/// bridged into the same subscriber. If a global subscriber is already set the
/// call is a no-op and returns `false`; the first subscriber wins.
pub fn init_logging(config: &CliConfig) -> bool {
    let filter = filter_from_config(config);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    subscriber.try_init().is_ok()
}
