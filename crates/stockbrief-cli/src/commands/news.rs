use serde::Serialize;
use stockbrief_core::{Field, NewsItem, ReportBuilder, Symbol};

use crate::cli::NewsArgs;
use crate::error::CliError;
use crate::output::text;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct NewsResponseData<'a> {
    symbol: &'a Symbol,
    limit: usize,
    news: &'a Field<Vec<NewsItem>>,
}

pub async fn run(args: &NewsArgs, builder: &ReportBuilder) -> Result<CommandResult, CliError> {
    let report = builder
        .build_from_input(&args.symbol, &args.options_input())
        .await?;

    let data = serde_json::to_value(NewsResponseData {
        symbol: report.symbol(),
        limit: args.limit,
        news: report.news(),
    })?;
    CommandResult::from_report(data, text::news(&report), &report)
}
