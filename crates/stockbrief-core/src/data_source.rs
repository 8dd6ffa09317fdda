//! Market data provider trait and request/response types.
//!
//! This module defines the adapter contract (`MarketDataProvider`) the report
//! builder talks to, along with the structured error every call returns.
//!
//! # Endpoints
//!
//! | Method | Request | Response | Description |
//! |--------|---------|----------|-------------|
//! | `quote_facts` | [`Symbol`] | [`QuoteFacts`] | Company facts and valuation |
//! | `history` | [`HistoryRequest`] | `Vec<Bar>` | OHLCV bars |
//! | `news` | [`NewsRequest`] | `Vec<NewsItem>` | Latest articles |
//! | `recommendations` | [`Symbol`] | [`RecommendationSummary`] | Analyst counts |
//! | `financial_statements` | [`Symbol`] | [`FinancialStatements`] | Annual statement tables |
//! | `calendar_events` | [`Symbol`] | [`CalendarEvents`] | Earnings and dividend dates |
//! | `dividends` | [`HistoryRequest`] | `Vec<Dividend>` | Dividends paid in the window |
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbrief_core::{MarketDataProvider, SourceError, Symbol, YahooProvider};
//!
//! async fn print_name(provider: &YahooProvider) -> Result<(), SourceError> {
//!     let symbol = Symbol::parse("AAPL").expect("valid symbol");
//!     let facts = provider.quote_facts(&symbol).await?;
//!     println!("{}", facts.company_name.as_deref().unwrap_or("N/A"));
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{
    Bar, CalendarEvents, Dividend, FinancialStatements, HistoryRange, Interval, NewsItem,
    QuoteFacts, RecommendationSummary, Symbol,
};

/// Boxed future returned by provider methods.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// The provider does not recognize the symbol.
    NotFound,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: HistoryRange,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: impl Into<HistoryRange>, interval: Interval) -> Self {
        Self {
            symbol,
            range: range.into(),
            interval,
        }
    }
}

/// Request payload for the news endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub symbol: Symbol,
    pub limit: usize,
}

impl NewsRequest {
    pub fn new(symbol: Symbol, limit: usize) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "news request limit must be greater than zero",
            ));
        }
        Ok(Self { symbol, limit })
    }
}

/// Market data adapter contract.
///
/// Every method is one upstream call. Implementations must not retry on
/// transient failure; the report builder records the failure and moves on.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as they may be shared across tasks.
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name used in envelope metadata.
    fn name(&self) -> &'static str;

    /// Fetches company facts and valuation fields.
    ///
    /// # Errors
    ///
    /// Returns [`SourceErrorKind::NotFound`] for an unknown symbol, or
    /// another kind when the provider cannot answer.
    fn quote_facts<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, QuoteFacts>;

    /// Fetches OHLCV bars for a period or explicit date range.
    ///
    /// Bars may come back in any order; the caller normalizes them. For an
    /// explicit date range only bars whose exchange-local date falls inside
    /// the range are returned.
    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Bar>>;

    /// Fetches dividends paid over the request's range. The interval is
    /// ignored; a symbol that paid none answers an empty list.
    fn dividends<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Dividend>>;

    /// Fetches up to `req.limit` news articles.
    fn news<'a>(&'a self, req: &'a NewsRequest) -> ProviderFuture<'a, Vec<NewsItem>>;

    /// Fetches the latest analyst recommendation counts.
    fn recommendations<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, RecommendationSummary>;

    /// Fetches annual income, balance sheet and cash flow statements.
    fn financial_statements<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, FinancialStatements>;

    /// Fetches upcoming earnings and dividend dates.
    fn calendar_events<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CalendarEvents>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::not_found("x").code(), "source.not_found");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert_eq!(
            SourceError::unavailable("down").to_string(),
            "down (source.unavailable)"
        );
    }

    #[test]
    fn news_request_rejects_zero_limit() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let error = NewsRequest::new(symbol, 0).expect_err("zero limit must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(error.message().contains("limit"));
    }
}
