//! `tagx`: evaluate and format tag expressions from the command line.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use tag_expressions_cli::cli::Cli;
use tag_expressions_cli::commands::run;
use tag_expressions_cli::config::CliConfig;
use tag_expressions_cli::error::CliError;
use tag_expressions_cli::logging::init_logging;

const FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(FAILURE);
        }
    };
    init_logging(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(&cli.command, &config, &mut out).and_then(|outcome| {
        out.flush()?;
        Ok(outcome)
    });
    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(FAILURE)
        }
    }
}

fn build_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let config = CliConfig::from_env()?;
    Ok(config.apply_overrides(cli.log_level, cli.output))
}
