use stockbrief_core::ReportBuilder;

use crate::cli::CompareArgs;
use crate::error::CliError;
use crate::output::text;

use super::CommandResult;

pub async fn run(args: &CompareArgs, builder: &ReportBuilder) -> Result<CommandResult, CliError> {
    let options = args.options_input().validate()?;
    let comparison = builder.compare(args.symbols.as_slice(), &options).await?;

    let warnings = comparison
        .excluded
        .iter()
        .map(|excluded| format!("{} excluded from ranking: {}", excluded.symbol, excluded.reason))
        .collect();

    let data = serde_json::to_value(&comparison)?;
    Ok(CommandResult::ok(data, text::comparison(&comparison)).with_warnings(warnings))
}
