mod compare;
mod news;
mod report;
mod stats;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use stockbrief_core::{
    Envelope, EnvelopeError, ProviderConfig, ReportBuilder, StockReport, ValidationError,
    YahooProvider,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata;

pub struct CommandResult {
    pub data: Value,
    pub text: String,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value, text: String) -> Self {
        Self {
            data,
            text,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Report notes become warnings and absent fields become errors.
    pub fn from_report(data: Value, text: String, report: &StockReport) -> Result<Self, CliError> {
        let errors = report
            .absences()
            .into_iter()
            .map(|(label, absence)| {
                EnvelopeError::new(absence.kind.code(), format!("{label}: {}", absence.message))
                    .map(|error| error.with_source(report.source()))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self::ok(data, text)
            .with_warnings(report.notes().to_vec())
            .with_errors(errors))
    }
}

/// Envelope for machine output plus its text rendering.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub text: String,
}

pub fn report_builder(cli: &Cli) -> ReportBuilder {
    let mut config = ProviderConfig::from_env();
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    ReportBuilder::new(Arc::new(YahooProvider::new(config)))
}

pub async fn run(cli: &Cli, builder: &ReportBuilder) -> Result<CommandOutput, CliError> {
    let started = Instant::now();

    let result = match &cli.command {
        Command::Report(args) => report::run(args, builder).await?,
        Command::News(args) => news::run(args, builder).await?,
        Command::Stats(args) => stats::run(args, builder).await?,
        Command::Compare(args) => compare::run(args, builder).await?,
    };

    let CommandResult {
        data,
        text,
        warnings,
        errors,
    } = result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let meta = metadata::envelope_meta(builder.provider_name(), latency_ms, warnings)?;
    let envelope = Envelope::with_errors(meta, data, errors)?;

    Ok(CommandOutput { envelope, text })
}
