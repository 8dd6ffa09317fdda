//! Core contracts for stockbrief.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The market data provider trait and the Yahoo Finance adapter
//! - Derived price analytics
//! - The stock report builder and multi-symbol comparison
//! - Response envelope and structured errors

pub mod adapters;
pub mod analytics;
pub mod comparison;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod report;

pub use adapters::{YahooAuthManager, YahooProvider};
pub use analytics::{DerivedStats, PriceStatistics, TrendSignal};
pub use comparison::{
    compare_reports, Comparison, ComparisonEntry, ComparisonSummary, ExcludedSymbol,
};
pub use config::ProviderConfig;
pub use data_source::{
    HistoryRequest, MarketDataProvider, NewsRequest, ProviderFuture, SourceError,
    SourceErrorKind,
};
pub use domain::{
    format_date, parse_date, BalanceSheet, Bar, CalendarEvents, CashFlowStatement, DateRange,
    Dividend, FinancialStatements, HistoryRange, IncomeStatement, Interval, NewsItem, Period,
    PriceSeries, QuoteFacts, RecommendationSummary, Symbol, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ReportError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use report::{
    Absence, AbsenceKind, Field, ReportBuilder, ReportOptions, ReportOptionsInput, StockReport,
    DEFAULT_MOVING_AVERAGE_WINDOWS, DEFAULT_NEWS_LIMIT,
};
