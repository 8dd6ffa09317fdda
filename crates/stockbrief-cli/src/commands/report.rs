use stockbrief_core::ReportBuilder;

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output::text;

use super::CommandResult;

pub async fn run(args: &ReportArgs, builder: &ReportBuilder) -> Result<CommandResult, CliError> {
    let report = builder
        .build_from_input(&args.symbol, &args.options_input())
        .await?;

    let data = serde_json::to_value(&report)?;
    CommandResult::from_report(data, text::report(&report), &report)
}
