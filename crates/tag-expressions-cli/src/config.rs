//! Tool configuration parsed from environment variables.
//!
//! Settings are read from variables prefixed with `TAGX_` and may be
//! overridden by command-line flags.

use std::env;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::error::CliError;

const LOG_LEVEL_VAR: &str = "TAGX_LOG_LEVEL";
const OUTPUT_VAR: &str = "TAGX_OUTPUT";

/// Verbosity of diagnostics written to stderr.
///
/// Defaults to `Warn` so diagnostics do not drown command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every parsed expression and command step.
    Trace,
    /// Rejected expressions and command inputs.
    Debug,
    /// Informational messages.
    Info,
    /// Problems that do not stop the command.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    const ALL: [Self; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

    /// Lowercase name accepted on the command line and in `TAGX_LOG_LEVEL`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Most verbose level the subscriber lets through.
    #[must_use]
    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        let wanted = if wanted == "warning" { "warn" } else { wanted.as_str() };
        Self::ALL
            .into_iter()
            .find(|level| level.name() == wanted)
            .ok_or_else(|| {
                CliError::InvalidConfig(format!(
                    "unknown log level '{s}', expected one of: {}",
                    Self::ALL.map(Self::name).join(", ")
                ))
            })
    }
}

/// Rendering of command results on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text, one value per line.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown output format '{s}', expected one of: text, json"
            ))),
        }
    }
}

/// Configuration for the `tagx` tool.
///
/// # Environment Variables
///
/// - `TAGX_LOG_LEVEL`: Sets the log level (trace, debug, info, warn, error)
/// - `TAGX_OUTPUT`: Sets the output format (text, json)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Output format for command results.
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a looked-up value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };
        let output = match lookup(OUTPUT_VAR) {
            Some(val) => val.parse()?,
            None => OutputFormat::default(),
        };
        Ok(Self { log_level, output })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// Command-line flags take precedence over environment-based values.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        output: Option<OutputFormat>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("DEBUG", LogLevel::Debug)]
    #[case("Info", LogLevel::Info)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn log_level_parses_case_insensitively(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "loud".parse::<LogLevel>();
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: unknown log level 'loud', expected one of: trace, debug, info, warn, error"
        );
    }

    #[rstest]
    #[case(LogLevel::Trace, LevelFilter::TRACE)]
    #[case(LogLevel::Warn, LevelFilter::WARN)]
    #[case(LogLevel::Error, LevelFilter::ERROR)]
    fn log_level_maps_to_filter(#[case] level: LogLevel, #[case] expected: LevelFilter) {
        assert_eq!(level.as_level_filter(), expected);
        assert_eq!(level.name().parse::<LogLevel>().ok(), Some(level));
    }

    #[test]
    fn output_format_parses_known_values() {
        assert_eq!("JSON".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn defaults_apply_when_variables_are_missing() {
        let config = CliConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn lookup_reads_prefixed_variables() {
        let config = CliConfig::from_lookup(|key| match key {
            "TAGX_LOG_LEVEL" => Some("debug".into()),
            "TAGX_OUTPUT" => Some("json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn lookup_surfaces_invalid_values() {
        let result = CliConfig::from_lookup(|key| (key == "TAGX_OUTPUT").then(|| "xml".into()));
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CliConfig::default().apply_overrides(Some(LogLevel::Error), None);
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.output, OutputFormat::Text);

        let config = CliConfig::default().apply_overrides(None, Some(OutputFormat::Json));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.output, OutputFormat::Json);
    }
}
