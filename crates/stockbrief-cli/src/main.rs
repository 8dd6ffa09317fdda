mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;
use crate::logging::LoggingConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    if let Err(error) = logging::init_logging(&LoggingConfig::from_env()) {
        eprintln!("warning: logging disabled: {error}");
    }

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    debug!(command = ?cli.command, "starting command");

    let builder = commands::report_builder(&cli);
    let output = commands::run(&cli, &builder).await?;
    output::render(&output, cli.format, cli.pretty)?;

    let envelope = &output.envelope;
    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
