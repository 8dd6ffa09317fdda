//! # Domain Models
//!
//! Canonical domain types for stock reports.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Normalized ticker symbol |
//! | [`Bar`] | OHLCV bar with timestamp |
//! | [`PriceSeries`] | Date-ordered, duplicate-free bars |
//! | [`QuoteFacts`] | Company facts and valuation snapshot |
//! | [`NewsItem`] | News article for a ticker |
//! | [`RecommendationSummary`] | Analyst recommendation counts |
//! | [`FinancialStatements`] | Annual income, balance sheet and cash flow tables |
//! | [`CalendarEvents`] | Upcoming earnings and dividend dates |
//! | [`Dividend`] | Cash dividend per share |
//! | [`Interval`] | Bar size (1m .. 3mo) |
//! | [`Period`] | Relative lookback (1d .. max) |
//! | [`DateRange`] | Explicit calendar range |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Constructors validate their invariants, so a `Bar` with `high < low`
//! or a `DateRange` that ends before it starts cannot be built.

mod fundamentals;
mod interval;
mod models;
mod period;
mod symbol;
mod timestamp;

pub use fundamentals::{
    BalanceSheet, CalendarEvents, CashFlowStatement, Dividend, FinancialStatements,
    IncomeStatement,
};
pub use interval::Interval;
pub use models::{Bar, NewsItem, PriceSeries, QuoteFacts, RecommendationSummary};
pub use period::{format_date, parse_date, DateRange, HistoryRange, Period};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
