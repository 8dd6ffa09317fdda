//! In-memory market data provider shared by behavior tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stockbrief_core::{
    Bar, CalendarEvents, Dividend, FinancialStatements, HistoryRequest, IncomeStatement,
    MarketDataProvider, NewsItem, NewsRequest, ProviderFuture, QuoteFacts, RecommendationSummary,
    ReportBuilder, SourceError, Symbol, UtcDateTime,
};

/// 2024-01-01T00:00:00Z
pub const START: i64 = 1_704_067_200;
pub const DAY: i64 = 86_400;

/// Serves canned results per symbol. Unconfigured symbols answer
/// `NotFound`, like an unknown ticker upstream.
#[derive(Default)]
pub struct FakeProvider {
    facts: HashMap<String, Result<QuoteFacts, SourceError>>,
    history: HashMap<String, Result<Vec<Bar>, SourceError>>,
    news: HashMap<String, Result<Vec<NewsItem>, SourceError>>,
    recommendations: HashMap<String, Result<RecommendationSummary, SourceError>>,
    dividends: HashMap<String, Result<Vec<Dividend>, SourceError>>,
    statements: HashMap<String, Result<FinancialStatements, SourceError>>,
    calendar: HashMap<String, Result<CalendarEvents, SourceError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facts(mut self, symbol: &str, facts: Result<QuoteFacts, SourceError>) -> Self {
        self.facts.insert(symbol.to_owned(), facts);
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Result<Vec<Bar>, SourceError>) -> Self {
        self.history.insert(symbol.to_owned(), bars);
        self
    }

    pub fn with_closes(self, symbol: &str, closes: &[f64]) -> Self {
        self.with_bars(symbol, Ok(bars_from_closes(closes)))
    }

    pub fn with_news(mut self, symbol: &str, news: Result<Vec<NewsItem>, SourceError>) -> Self {
        self.news.insert(symbol.to_owned(), news);
        self
    }

    pub fn with_recommendations(
        mut self,
        symbol: &str,
        summary: Result<RecommendationSummary, SourceError>,
    ) -> Self {
        self.recommendations.insert(symbol.to_owned(), summary);
        self
    }

    pub fn with_dividends(
        mut self,
        symbol: &str,
        dividends: Result<Vec<Dividend>, SourceError>,
    ) -> Self {
        self.dividends.insert(symbol.to_owned(), dividends);
        self
    }

    pub fn with_statements(
        mut self,
        symbol: &str,
        statements: Result<FinancialStatements, SourceError>,
    ) -> Self {
        self.statements.insert(symbol.to_owned(), statements);
        self
    }

    pub fn with_calendar(
        mut self,
        symbol: &str,
        calendar: Result<CalendarEvents, SourceError>,
    ) -> Self {
        self.calendar.insert(symbol.to_owned(), calendar);
        self
    }

    /// A symbol for which every endpoint answers successfully.
    pub fn with_healthy(self, symbol: &str, closes: &[f64]) -> Self {
        self.with_facts(symbol, Ok(facts(symbol)))
            .with_closes(symbol, closes)
            .with_dividends(symbol, Ok(vec![dividend(1, 0.24)]))
            .with_news(symbol, Ok(Vec::new()))
            .with_recommendations(symbol, Ok(RecommendationSummary::new(1, 2, 3, 0, 0)))
            .with_statements(symbol, Ok(statements(1.0e9, 2.0e8)))
            .with_calendar(
                symbol,
                Ok(CalendarEvents {
                    earnings_dates: vec![at_day(30)],
                    ..CalendarEvents::default()
                }),
            )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn answer<T: Clone>(
        table: &HashMap<String, Result<T, SourceError>>,
        symbol: &Symbol,
    ) -> Result<T, SourceError> {
        table.get(symbol.as_str()).cloned().unwrap_or_else(|| {
            Err(SourceError::not_found(format!("unknown symbol {symbol}")))
        })
    }
}

impl MarketDataProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn quote_facts<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, QuoteFacts> {
        self.record(format!("quote_facts:{symbol}"));
        let result = Self::answer(&self.facts, symbol);
        Box::pin(async move { result })
    }

    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Bar>> {
        self.record(format!(
            "history:{}:{}:{}",
            req.symbol,
            req.range.label(),
            req.interval.as_str()
        ));
        let result = Self::answer(&self.history, &req.symbol);
        Box::pin(async move { result })
    }

    fn news<'a>(&'a self, req: &'a NewsRequest) -> ProviderFuture<'a, Vec<NewsItem>> {
        self.record(format!("news:{}:{}", req.symbol, req.limit));
        let result = Self::answer(&self.news, &req.symbol);
        Box::pin(async move { result })
    }

    fn recommendations<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, RecommendationSummary> {
        self.record(format!("recommendations:{symbol}"));
        let result = Self::answer(&self.recommendations, symbol);
        Box::pin(async move { result })
    }

    fn dividends<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Dividend>> {
        self.record(format!("dividends:{}:{}", req.symbol, req.range.label()));
        let result = Self::answer(&self.dividends, &req.symbol);
        Box::pin(async move { result })
    }

    fn financial_statements<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, FinancialStatements> {
        self.record(format!("financial_statements:{symbol}"));
        let result = Self::answer(&self.statements, symbol);
        Box::pin(async move { result })
    }

    fn calendar_events<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CalendarEvents> {
        self.record(format!("calendar_events:{symbol}"));
        let result = Self::answer(&self.calendar, symbol);
        Box::pin(async move { result })
    }
}

pub fn builder(provider: &Arc<FakeProvider>) -> ReportBuilder {
    ReportBuilder::new(provider.clone())
}

pub fn at_day(day: i64) -> UtcDateTime {
    UtcDateTime::from_unix_timestamp(START + day * DAY).expect("valid timestamp")
}

pub fn bar(day: i64, close: f64) -> Bar {
    Bar::new(
        at_day(day),
        close,
        close + 1.0,
        (close - 1.0).max(0.0),
        close,
        Some(1_000),
    )
    .expect("valid bar")
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(day, &close)| bar(day as i64, close))
        .collect()
}

pub fn facts(symbol: &str) -> QuoteFacts {
    QuoteFacts {
        company_name: Some(format!("{symbol} Corp")),
        current_price: Some(100.0),
        currency: Some(String::from("USD")),
        market_cap: Some(1.0e9),
        ..QuoteFacts::default()
    }
}

pub fn dividend(day: i64, amount: f64) -> Dividend {
    Dividend::new(at_day(day), amount).expect("valid dividend")
}

pub fn statements(revenue: f64, net_income: f64) -> FinancialStatements {
    FinancialStatements {
        income_statements: vec![IncomeStatement {
            period_end: Some(at_day(0)),
            total_revenue: Some(revenue),
            net_income: Some(net_income),
            ..IncomeStatement::default()
        }],
        ..FinancialStatements::default()
    }
}

pub fn news_item(title: &str, day: Option<i64>) -> NewsItem {
    NewsItem {
        title: title.to_owned(),
        publisher: Some(String::from("Wire")),
        link: Some(format!("https://news.example.test/{title}")),
        published_at: day.map(at_day),
        summary: format!("{title} in full, with every sentence kept intact."),
    }
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be defined");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
