//! CLI argument definitions for stockbrief.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `report` | Full stock report: facts, prices, news, statistics |
//! | `news` | Latest news for a symbol |
//! | `stats` | Price statistics and moving averages |
//! | `compare` | Rank several symbols by price change |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, text) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--timeout-ms` | env or `10000` | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! stockbrief report AAPL --period 6mo --pretty
//! stockbrief --format text stats MSFT --start 2024-01-01 --end 2024-07-01
//! stockbrief compare AAPL MSFT GOOGL --period 1y
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockbrief_core::ReportOptionsInput;

/// Stock reports from Yahoo Finance.
#[derive(Debug, Parser)]
#[command(
    name = "stockbrief",
    author,
    version,
    about = "Stock reports: quote facts, price history, news and derived statistics"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Request timeout in milliseconds. Overrides STOCKBRIEF_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Envelope JSON object.
    Json,
    /// Human-readable text.
    Text,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a full stock report.
    ///
    /// # Examples
    ///
    ///   stockbrief report AAPL
    ///   stockbrief report AAPL --period 5y --interval 1wk --ma 10,40
    Report(ReportArgs),

    /// Fetch the latest news for a symbol.
    News(NewsArgs),

    /// Compute price statistics for a symbol.
    Stats(StatsArgs),

    /// Rank several symbols by percentage change over the same window.
    ///
    /// # Examples
    ///
    ///   stockbrief compare AAPL MSFT GOOGL
    Compare(CompareArgs),
}

/// Time window shared by history-based commands.
#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    /// Lookback period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
    #[arg(long)]
    pub period: Option<String>,

    /// Range start (YYYY-MM-DD). Requires --end; overrides --period.
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Range end (YYYY-MM-DD), exclusive.
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Bar interval: 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo.
    #[arg(long)]
    pub interval: Option<String>,
}

impl HistoryArgs {
    fn to_input(&self) -> ReportOptionsInput {
        ReportOptionsInput {
            period: self.period.clone(),
            interval: self.interval.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            ..ReportOptionsInput::default()
        }
    }
}

/// Switches off every field except the price history.
fn history_only(input: ReportOptionsInput) -> ReportOptionsInput {
    ReportOptionsInput {
        news_limit: Some(0),
        include_quote_facts: Some(false),
        include_history: Some(true),
        include_dividends: Some(false),
        include_recommendations: Some(false),
        include_financial_statements: Some(false),
        include_calendar_events: Some(false),
        ..input
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Ticker symbol (e.g. AAPL, BRK-B, ^GSPC).
    pub symbol: String,

    #[command(flatten)]
    pub history: HistoryArgs,

    /// Maximum number of news items (0 skips news).
    #[arg(long)]
    pub news_limit: Option<usize>,

    /// Moving average windows, comma separated.
    #[arg(long = "ma", value_delimiter = ',')]
    pub moving_averages: Option<Vec<usize>>,

    /// Skip analyst recommendations.
    #[arg(long, default_value_t = false)]
    pub no_recommendations: bool,

    /// Skip income, balance sheet and cash flow statements.
    #[arg(long, default_value_t = false)]
    pub no_financials: bool,

    /// Skip upcoming earnings and dividend dates.
    #[arg(long, default_value_t = false)]
    pub no_calendar: bool,

    /// Skip dividends paid in the window.
    #[arg(long, default_value_t = false)]
    pub no_dividends: bool,
}

impl ReportArgs {
    pub fn options_input(&self) -> ReportOptionsInput {
        ReportOptionsInput {
            news_limit: self.news_limit,
            moving_average_windows: self.moving_averages.clone(),
            include_recommendations: Some(!self.no_recommendations),
            include_financial_statements: Some(!self.no_financials),
            include_calendar_events: Some(!self.no_calendar),
            include_dividends: Some(!self.no_dividends),
            ..self.history.to_input()
        }
    }
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    pub symbol: String,

    /// Maximum number of news items.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl NewsArgs {
    pub fn options_input(&self) -> ReportOptionsInput {
        ReportOptionsInput {
            news_limit: Some(self.limit),
            include_history: Some(false),
            ..history_only(ReportOptionsInput::default())
        }
    }
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    pub symbol: String,

    #[command(flatten)]
    pub history: HistoryArgs,

    /// Moving average windows, comma separated.
    #[arg(long = "ma", value_delimiter = ',')]
    pub moving_averages: Option<Vec<usize>>,
}

impl StatsArgs {
    pub fn options_input(&self) -> ReportOptionsInput {
        ReportOptionsInput {
            moving_average_windows: self.moving_averages.clone(),
            ..history_only(self.history.to_input())
        }
    }
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Two or more ticker symbols.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub history: HistoryArgs,
}

impl CompareArgs {
    pub fn options_input(&self) -> ReportOptionsInput {
        history_only(self.history.to_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbrief_core::ReportOptions;

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "stockbrief",
            "--format",
            "text",
            "report",
            "AAPL",
            "--period",
            "6mo",
            "--ma",
            "10,40",
            "--news-limit",
            "3",
            "--no-recommendations",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.format, OutputFormat::Text);
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        let input = args.options_input();
        assert_eq!(input.period.as_deref(), Some("6mo"));
        assert_eq!(input.moving_average_windows, Some(vec![10, 40]));
        assert_eq!(input.news_limit, Some(3));
        assert_eq!(input.include_recommendations, Some(false));
    }

    #[test]
    fn start_requires_end() {
        let result = Cli::try_parse_from(["stockbrief", "stats", "AAPL", "--start", "2024-01-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn report_fundamentals_can_be_skipped() {
        let cli = Cli::try_parse_from([
            "stockbrief",
            "report",
            "AAPL",
            "--no-financials",
            "--no-calendar",
        ])
        .expect("arguments should parse");
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };

        let input = args.options_input();
        assert_eq!(input.include_financial_statements, Some(false));
        assert_eq!(input.include_calendar_events, Some(false));
        assert_eq!(input.include_dividends, Some(true));
        assert_eq!(input.include_quote_facts, None);
    }

    #[test]
    fn news_requests_nothing_but_news() {
        let cli = Cli::try_parse_from(["stockbrief", "news", "AAPL", "--limit", "4"])
            .expect("arguments should parse");
        let Command::News(args) = cli.command else {
            panic!("expected news command");
        };

        let options = args.options_input().validate().expect("valid options");
        assert_eq!(options.news_limit, 4);
        assert!(!options.include_quote_facts);
        assert!(!options.include_history);
        assert!(!options.include_dividends);
        assert!(!options.include_recommendations);
        assert!(!options.include_financial_statements);
        assert!(!options.include_calendar_events);
    }

    #[test]
    fn stats_requests_only_history() {
        let cli = Cli::try_parse_from(["stockbrief", "stats", "AAPL", "--ma", "5"])
            .expect("arguments should parse");
        let Command::Stats(args) = cli.command else {
            panic!("expected stats command");
        };

        let options = args.options_input().validate().expect("valid options");
        let expected = ReportOptions::default()
            .history_only()
            .with_moving_average_windows([5]);
        assert_eq!(options, expected);
    }

    #[test]
    fn compare_skips_news_and_recommendations() {
        let cli = Cli::try_parse_from(["stockbrief", "compare", "AAPL", "MSFT"])
            .expect("arguments should parse");
        let Command::Compare(args) = cli.command else {
            panic!("expected compare command");
        };

        assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
        let input = args.options_input();
        assert_eq!(input.news_limit, Some(0));
        assert_eq!(input.include_recommendations, Some(false));
        assert_eq!(input.include_quote_facts, Some(false));
        assert_eq!(input.include_history, Some(true));
    }
}
