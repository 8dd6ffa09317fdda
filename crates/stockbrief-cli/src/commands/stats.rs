use serde::Serialize;
use stockbrief_core::{DerivedStats, HistoryRange, Interval, ReportBuilder, Symbol};

use crate::cli::StatsArgs;
use crate::error::CliError;
use crate::output::text;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StatsResponseData<'a> {
    symbol: &'a Symbol,
    range: HistoryRange,
    interval: Interval,
    bars: usize,
    stats: &'a DerivedStats,
}

pub async fn run(args: &StatsArgs, builder: &ReportBuilder) -> Result<CommandResult, CliError> {
    let report = builder
        .build_from_input(&args.symbol, &args.options_input())
        .await?;

    let data = serde_json::to_value(StatsResponseData {
        symbol: report.symbol(),
        range: report.options().range,
        interval: report.options().interval,
        bars: report.price_series().value().map_or(0, |series| series.len()),
        stats: report.derived_stats(),
    })?;
    CommandResult::from_report(data, text::stats(&report), &report)
}
