//! # Stock Report Builder
//!
//! [`ReportBuilder`] fetches every part of a [`StockReport`] from a
//! [`MarketDataProvider`], one sequential call per requested field, and
//! derives the statistics from the price series. Fields the caller opts out
//! of are never fetched and read as [`AbsenceKind::NotRequested`].
//!
//! A provider failure never fails the report. Each field is a [`Field`]:
//! either the value or the [`Absence`] explaining why it is missing. Only
//! caller mistakes (bad symbol syntax, unsupported option values) are
//! returned as [`ReportError`], and they are detected before any provider
//! call.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockbrief_core::{ReportBuilder, ReportOptions, YahooProvider};
//!
//! let builder = ReportBuilder::new(Arc::new(YahooProvider::default()));
//! let report = builder.build("AAPL", &ReportOptions::default()).await?;
//! println!("{:?}", report.derived_stats().change_pct);
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analytics::DerivedStats;
use crate::comparison::{compare_reports, Comparison};
use crate::data_source::{
    HistoryRequest, MarketDataProvider, NewsRequest, ProviderFuture, SourceError,
    SourceErrorKind,
};
use crate::{
    CalendarEvents, DateRange, Dividend, FinancialStatements, HistoryRange, Interval, NewsItem,
    Period, PriceSeries, QuoteFacts, RecommendationSummary, ReportError, Symbol, UtcDateTime,
};

pub const DEFAULT_NEWS_LIMIT: usize = 10;
pub const DEFAULT_MOVING_AVERAGE_WINDOWS: [usize; 3] = [20, 50, 200];

// ============================================================================
// Per-field outcome
// ============================================================================

/// Why a report field has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// The provider does not recognize the symbol.
    NotFound,
    Unavailable,
    RateLimited,
    /// The provider answered with something that could not be decoded.
    InvalidResponse,
    /// The caller did not ask for the field.
    NotRequested,
}

impl AbsenceKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "field.not_found",
            Self::Unavailable => "field.unavailable",
            Self::RateLimited => "field.rate_limited",
            Self::InvalidResponse => "field.invalid_response",
            Self::NotRequested => "field.not_requested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub kind: AbsenceKind,
    pub message: String,
}

impl Absence {
    pub fn new(kind: AbsenceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_requested() -> Self {
        Self::new(AbsenceKind::NotRequested, "not requested")
    }
}

impl From<SourceError> for Absence {
    fn from(error: SourceError) -> Self {
        let kind = match error.kind() {
            SourceErrorKind::NotFound => AbsenceKind::NotFound,
            SourceErrorKind::RateLimited => AbsenceKind::RateLimited,
            SourceErrorKind::Internal => AbsenceKind::InvalidResponse,
            SourceErrorKind::Unavailable | SourceErrorKind::InvalidRequest => {
                AbsenceKind::Unavailable
            }
        };
        Self::new(kind, error.message())
    }
}

/// Outcome of fetching one report field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Field<T> {
    Present(T),
    Absent(Absence),
}

impl<T> Field<T> {
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<&Absence> {
        match self {
            Self::Present(_) => None,
            Self::Absent(absence) => Some(absence),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Present(value) => Field::Present(f(value)),
            Self::Absent(absence) => Field::Absent(absence),
        }
    }
}

impl<T> From<Result<T, SourceError>> for Field<T> {
    fn from(result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Self::Present(value),
            Err(error) => Self::Absent(error.into()),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Validated report request options.
///
/// Every field is requested by default. A zero `news_limit` skips news.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub range: HistoryRange,
    pub interval: Interval,
    pub news_limit: usize,
    pub moving_average_windows: BTreeSet<usize>,
    pub include_quote_facts: bool,
    pub include_history: bool,
    pub include_dividends: bool,
    pub include_recommendations: bool,
    pub include_financial_statements: bool,
    pub include_calendar_events: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            range: HistoryRange::from(Period::OneYear),
            interval: Interval::OneDay,
            news_limit: DEFAULT_NEWS_LIMIT,
            moving_average_windows: BTreeSet::from(DEFAULT_MOVING_AVERAGE_WINDOWS),
            include_quote_facts: true,
            include_history: true,
            include_dividends: true,
            include_recommendations: true,
            include_financial_statements: true,
            include_calendar_events: true,
        }
    }
}

impl ReportOptions {
    pub fn with_range(mut self, range: impl Into<HistoryRange>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_news_limit(mut self, news_limit: usize) -> Self {
        self.news_limit = news_limit;
        self
    }

    pub fn with_moving_average_windows(
        mut self,
        windows: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.moving_average_windows = windows.into_iter().collect();
        self
    }

    pub fn with_quote_facts(mut self, include: bool) -> Self {
        self.include_quote_facts = include;
        self
    }

    pub fn with_history(mut self, include: bool) -> Self {
        self.include_history = include;
        self
    }

    pub fn with_dividends(mut self, include: bool) -> Self {
        self.include_dividends = include;
        self
    }

    pub fn with_recommendations(mut self, include: bool) -> Self {
        self.include_recommendations = include;
        self
    }

    pub fn with_financial_statements(mut self, include: bool) -> Self {
        self.include_financial_statements = include;
        self
    }

    pub fn with_calendar_events(mut self, include: bool) -> Self {
        self.include_calendar_events = include;
        self
    }

    /// Price history alone: no facts, news or fundamentals.
    pub fn history_only(self) -> Self {
        self.with_quote_facts(false)
            .with_history(true)
            .with_dividends(false)
            .with_news_limit(0)
            .with_recommendations(false)
            .with_financial_statements(false)
            .with_calendar_events(false)
    }

    /// Rejects a zero moving average window.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.moving_average_windows.contains(&0) {
            return Err(ReportError::invalid_option(
                "moving_average_windows",
                "window sizes must be positive",
            ));
        }
        Ok(())
    }
}

/// Unvalidated options as received from a caller, e.g. CLI flags.
///
/// Unset fields take the [`ReportOptions::default`] value. An explicit
/// `start`/`end` pair overrides `period`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptionsInput {
    pub period: Option<String>,
    pub interval: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub news_limit: Option<usize>,
    pub moving_average_windows: Option<Vec<usize>>,
    pub include_quote_facts: Option<bool>,
    pub include_history: Option<bool>,
    pub include_dividends: Option<bool>,
    pub include_recommendations: Option<bool>,
    pub include_financial_statements: Option<bool>,
    pub include_calendar_events: Option<bool>,
}

impl ReportOptionsInput {
    pub fn validate(&self) -> Result<ReportOptions, ReportError> {
        let defaults = ReportOptions::default();

        let interval = match self.interval.as_deref() {
            Some(raw) => raw
                .parse::<Interval>()
                .map_err(|e| ReportError::invalid_option("interval", e.to_string()))?,
            None => defaults.interval,
        };

        let range = match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                if self.period.is_some() {
                    debug!("explicit date range overrides period");
                }
                DateRange::parse(start, end)
                    .map(HistoryRange::from)
                    .map_err(|e| ReportError::invalid_option("date_range", e.to_string()))?
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ReportError::invalid_option(
                    "date_range",
                    "start and end must be given together",
                ));
            }
            (None, None) => match self.period.as_deref() {
                Some(raw) => raw
                    .parse::<Period>()
                    .map(HistoryRange::from)
                    .map_err(|e| ReportError::invalid_option("period", e.to_string()))?,
                None => defaults.range,
            },
        };

        let options = ReportOptions {
            range,
            interval,
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            moving_average_windows: self
                .moving_average_windows
                .clone()
                .map(|windows| windows.into_iter().collect())
                .unwrap_or(defaults.moving_average_windows),
            include_quote_facts: self
                .include_quote_facts
                .unwrap_or(defaults.include_quote_facts),
            include_history: self.include_history.unwrap_or(defaults.include_history),
            include_dividends: self.include_dividends.unwrap_or(defaults.include_dividends),
            include_recommendations: self
                .include_recommendations
                .unwrap_or(defaults.include_recommendations),
            include_financial_statements: self
                .include_financial_statements
                .unwrap_or(defaults.include_financial_statements),
            include_calendar_events: self
                .include_calendar_events
                .unwrap_or(defaults.include_calendar_events),
        };
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Report
// ============================================================================

/// Everything known about one symbol at build time.
///
/// Immutable once built; rebuilding re-fetches from the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    symbol: Symbol,
    source: String,
    generated_at: UtcDateTime,
    options: ReportOptions,
    quote_facts: Field<QuoteFacts>,
    price_series: Field<PriceSeries>,
    dividends: Field<Vec<Dividend>>,
    news: Field<Vec<NewsItem>>,
    recommendations: Field<RecommendationSummary>,
    financial_statements: Field<FinancialStatements>,
    calendar_events: Field<CalendarEvents>,
    derived_stats: DerivedStats,
    notes: Vec<String>,
}

impl StockReport {
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Name of the provider that supplied the data.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn generated_at(&self) -> UtcDateTime {
        self.generated_at
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn quote_facts(&self) -> &Field<QuoteFacts> {
        &self.quote_facts
    }

    pub fn price_series(&self) -> &Field<PriceSeries> {
        &self.price_series
    }

    pub fn dividends(&self) -> &Field<Vec<Dividend>> {
        &self.dividends
    }

    pub fn news(&self) -> &Field<Vec<NewsItem>> {
        &self.news
    }

    pub fn recommendations(&self) -> &Field<RecommendationSummary> {
        &self.recommendations
    }

    pub fn financial_statements(&self) -> &Field<FinancialStatements> {
        &self.financial_statements
    }

    pub fn calendar_events(&self) -> &Field<CalendarEvents> {
        &self.calendar_events
    }

    pub fn derived_stats(&self) -> &DerivedStats {
        &self.derived_stats
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Absent fields with their labels, skipping fields the caller did not
    /// request.
    pub fn absences(&self) -> Vec<(&'static str, &Absence)> {
        [
            ("quote_facts", self.quote_facts.absence()),
            ("price_series", self.price_series.absence()),
            ("dividends", self.dividends.absence()),
            ("news", self.news.absence()),
            ("recommendations", self.recommendations.absence()),
            ("financial_statements", self.financial_statements.absence()),
            ("calendar_events", self.calendar_events.absence()),
        ]
        .into_iter()
        .filter_map(|(label, absence)| absence.map(|absence| (label, absence)))
        .filter(|(_, absence)| absence.kind != AbsenceKind::NotRequested)
        .collect()
    }

    /// True when at least one requested field could not be fetched.
    pub fn is_partial(&self) -> bool {
        !self.absences().is_empty()
    }

    /// True when the provider did not recognize the symbol: the quote facts
    /// and price series, whichever were requested, both came back not found.
    ///
    /// Other fields are ignored. A news search for an unknown ticker simply
    /// answers an empty list.
    pub fn is_not_found(&self) -> bool {
        let identifying = [
            (self.options.include_quote_facts, self.quote_facts.absence()),
            (self.options.include_history, self.price_series.absence()),
        ]
        .into_iter()
        .filter_map(|(requested, absence)| requested.then_some(absence))
        .collect::<Vec<_>>();

        !identifying.is_empty()
            && identifying
                .iter()
                .all(|absence| absence.is_some_and(|a| a.kind == AbsenceKind::NotFound))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds [`StockReport`]s from a market data provider.
#[derive(Clone)]
pub struct ReportBuilder {
    provider: Arc<dyn MarketDataProvider>,
}

impl ReportBuilder {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Validates `input` and builds the report.
    pub async fn build_from_input(
        &self,
        symbol: &str,
        input: &ReportOptionsInput,
    ) -> Result<StockReport, ReportError> {
        let options = input.validate()?;
        self.build(symbol, &options).await
    }

    pub async fn build(
        &self,
        symbol: &str,
        options: &ReportOptions,
    ) -> Result<StockReport, ReportError> {
        let symbol = Symbol::parse(symbol)?;
        options.validate()?;
        Ok(self.assemble(symbol, options).await)
    }

    /// Builds one report per symbol, in order, and ranks them.
    ///
    /// Every symbol is checked before the first provider call. Ranking needs
    /// price history, so `options` must request it.
    pub async fn compare<S: AsRef<str>>(
        &self,
        symbols: &[S],
        options: &ReportOptions,
    ) -> Result<Comparison, ReportError> {
        options.validate()?;
        if !options.include_history {
            return Err(ReportError::invalid_option(
                "include_history",
                "comparison ranks symbols by their price history",
            ));
        }
        let symbols = symbols
            .iter()
            .map(|raw| Symbol::parse(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut reports = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            reports.push(self.assemble(symbol, options).await);
        }

        Ok(compare_reports(&reports))
    }

    async fn assemble(&self, symbol: Symbol, options: &ReportOptions) -> StockReport {
        let provider = self.provider.as_ref();
        let history = HistoryRequest::new(symbol.clone(), options.range, options.interval);

        let quote_facts =
            fetch_requested(options.include_quote_facts, || provider.quote_facts(&symbol)).await;

        let price_series = fetch_requested(options.include_history, || provider.history(&history))
            .await
            .map(PriceSeries::new);

        let dividends = fetch_requested(options.include_dividends, || provider.dividends(&history))
            .await
            .map(|mut dividends| {
                dividends.sort_by_key(|dividend| dividend.date);
                dividends
            });

        let news = match NewsRequest::new(symbol.clone(), options.news_limit) {
            Ok(request) => Field::from(provider.news(&request).await).map(|mut items| {
                newest_first(&mut items);
                items.truncate(options.news_limit);
                items
            }),
            // A zero limit asks for nothing.
            Err(_) => Field::Present(Vec::new()),
        };

        let recommendations = fetch_requested(options.include_recommendations, || {
            provider.recommendations(&symbol)
        })
        .await;

        let financial_statements = fetch_requested(options.include_financial_statements, || {
            provider.financial_statements(&symbol)
        })
        .await;

        let calendar_events = fetch_requested(options.include_calendar_events, || {
            provider.calendar_events(&symbol)
        })
        .await;

        let empty = PriceSeries::empty();
        let derived_stats = DerivedStats::compute(
            price_series.value().unwrap_or(&empty),
            &options.moving_average_windows,
        );

        let mut report = StockReport {
            symbol,
            source: provider.name().to_owned(),
            generated_at: UtcDateTime::now(),
            options: options.clone(),
            quote_facts,
            price_series,
            dividends,
            news,
            recommendations,
            financial_statements,
            calendar_events,
            derived_stats,
            notes: Vec::new(),
        };
        report.notes = notes_for(&report);

        info!(
            symbol = %report.symbol,
            source = %report.source,
            partial = report.is_partial(),
            bars = report.price_series.value().map_or(0, PriceSeries::len),
            "built stock report"
        );
        report
    }
}

/// Calls the provider only when the field was requested.
async fn fetch_requested<'a, T>(
    requested: bool,
    fetch: impl FnOnce() -> ProviderFuture<'a, T>,
) -> Field<T> {
    if requested {
        Field::from(fetch().await)
    } else {
        Field::Absent(Absence::not_requested())
    }
}

fn newest_first(items: &mut [NewsItem]) {
    // None sorts below Some, so undated items end up last.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

fn notes_for(report: &StockReport) -> Vec<String> {
    let mut notes = report
        .absences()
        .into_iter()
        .map(|(label, absence)| {
            warn!(
                symbol = %report.symbol,
                field = label,
                kind = absence.kind.code(),
                reason = %absence.message,
                "report field unavailable"
            );
            format!("{label} unavailable: {}", absence.message)
        })
        .collect::<Vec<_>>();

    if report.is_not_found() {
        notes.push(format!(
            "symbol {} was not recognized by {}",
            report.symbol, report.source
        ));
    }
    notes
}
