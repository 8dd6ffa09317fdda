use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::data_source::{
    HistoryRequest, MarketDataProvider, NewsRequest, ProviderFuture, SourceError,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{
    BalanceSheet, Bar, CalendarEvents, CashFlowStatement, Dividend, FinancialStatements,
    HistoryRange, IncomeStatement, NewsItem, QuoteFacts, RecommendationSummary, Symbol,
    UtcDateTime,
};

const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const FACT_MODULES: &str = "price,summaryDetail,assetProfile,financialData";
const RECOMMENDATION_MODULES: &str = "recommendationTrend";
const FINANCIAL_MODULES: &str =
    "incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";
const CALENDAR_MODULES: &str = "calendarEvents";
/// Explicit date windows are widened by a day on each side so sessions
/// stamped on the neighbouring UTC day are fetched, then filtered by the
/// exchange-local date.
const RANGE_PADDING_SECS: i64 = 86_400;

// ============================================================================
// Crumb authentication
// ============================================================================

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Yahoo cookie/crumb authentication.
///
/// quoteSummary calls need a session cookie from fc.yahoo.com (kept by the
/// transport's cookie jar) plus a crumb token passed as a query parameter.
#[derive(Debug)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
    ttl: Duration,
    cookie: Option<String>,
}

impl YahooAuthManager {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl: Duration::from_secs(config.crumb_ttl_secs),
            cookie: config.cookie.clone(),
        }
    }

    /// Adds the referer and, when configured, the fixed session cookie.
    pub fn decorate(&self, request: HttpRequest) -> HttpRequest {
        let request = request.with_header("referer", REFERER);
        match &self.cookie {
            Some(cookie) => request.with_header("cookie", cookie.as_str()),
            None => request,
        }
    }

    fn cached(&self) -> Option<String> {
        let guard = self.crumb.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.value.clone())
    }

    /// Returns the cached crumb, fetching a new one when missing or expired.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        let crumb = self.fetch_crumb(http_client, timeout_ms).await?;
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedCrumb {
            value: crumb.clone(),
            fetched_at: Instant::now(),
        });
        Ok(crumb)
    }

    async fn fetch_crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        if self.cookie.is_none() {
            // fc.yahoo.com answers 404 but still sets the session cookie.
            let request = self.decorate(HttpRequest::get(COOKIE_URL).with_timeout_ms(timeout_ms));
            http_client.execute(request).await.map_err(|error| {
                SourceError::unavailable(format!(
                    "failed to fetch yahoo session cookie: {}",
                    error.message()
                ))
            })?;
        }

        for endpoint in CRUMB_URLS {
            let request = self.decorate(HttpRequest::get(endpoint).with_timeout_ms(timeout_ms));
            let response = match http_client.execute(request).await {
                Ok(response) => response,
                Err(error) => {
                    debug!(endpoint, error = error.message(), "crumb endpoint failed");
                    continue;
                }
            };

            if response.status == 429 {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if !response.is_success() {
                continue;
            }

            let body = response.body.trim();
            if body.contains("<html") || body.contains("<!DOCTYPE") {
                continue;
            }
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if !body.is_empty() && body.len() < 100 && !body.contains(char::is_whitespace) {
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }

    /// Drops the cached crumb so the next call re-authenticates.
    pub fn invalidate(&self) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ============================================================================
// Yahoo provider
// ============================================================================

/// Yahoo Finance adapter over the [`HttpClient`] seam.
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    config: ProviderConfig,
    auth: YahooAuthManager,
}

impl YahooProvider {
    /// Provider backed by a reqwest client built from `config`.
    pub fn new(config: ProviderConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config));
        Self::with_http_client(http_client, config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        Self {
            auth: YahooAuthManager::new(&config),
            http_client,
            config,
        }
    }

    async fn send(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let request = self
            .auth
            .decorate(HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms));

        self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
        })
    }

    /// Calls an endpoint that requires a crumb. A 401 means the crumb went
    /// stale; it is refreshed and the call repeated once.
    async fn send_authenticated(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let timeout_ms = self.config.timeout_ms;
        let crumb = self.auth.crumb(self.http_client.as_ref(), timeout_ms).await?;
        let response = self.send(&with_crumb(url, &crumb)).await?;

        if response.status != 401 {
            return Ok(response);
        }

        debug!(url, "yahoo rejected crumb, re-authenticating");
        self.auth.invalidate();
        let crumb = self.auth.crumb(self.http_client.as_ref(), timeout_ms).await?;
        self.send(&with_crumb(url, &crumb)).await
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<Vec<Bar>, SourceError> {
        let url = format!(
            "{CHART_URL}/{}?{}&interval={}&includePrePost=false",
            urlencoding::encode(req.symbol.as_str()),
            chart_window(req.range),
            req.interval.as_str(),
        );
        debug!(symbol = %req.symbol, url = %url, "fetching yahoo chart");

        let response = self.send(&url).await?;
        let body = expect_success(response, "chart", &req.symbol)?;
        let chart = decode_chart(&body, &req.symbol)?;
        chart_bars(chart, &req.symbol, req.range)
    }

    async fn fetch_dividends(&self, req: &HistoryRequest) -> Result<Vec<Dividend>, SourceError> {
        let url = format!(
            "{CHART_URL}/{}?{}&interval=1d&events=div",
            urlencoding::encode(req.symbol.as_str()),
            chart_window(req.range),
        );
        debug!(symbol = %req.symbol, url = %url, "fetching yahoo dividends");

        let response = self.send(&url).await?;
        let body = expect_success(response, "chart", &req.symbol)?;
        let chart = decode_chart(&body, &req.symbol)?;
        Ok(chart_dividends(chart, &req.symbol, req.range))
    }

    async fn fetch_summary(
        &self,
        symbol: &Symbol,
        modules: &str,
    ) -> Result<YahooSummaryResult, SourceError> {
        let url = format!(
            "{QUOTE_SUMMARY_URL}/{}?modules={modules}",
            urlencoding::encode(symbol.as_str())
        );
        debug!(symbol = %symbol, modules, "fetching yahoo quoteSummary");

        let response = self.send_authenticated(&url).await?;
        let body = expect_success(response, "quoteSummary", symbol)?;
        parse_summary(&body, symbol)
    }

    async fn fetch_news(&self, req: &NewsRequest) -> Result<Vec<NewsItem>, SourceError> {
        let url = format!(
            "{SEARCH_URL}?q={}&quotesCount=0&newsCount={}",
            urlencoding::encode(req.symbol.as_str()),
            req.limit
        );
        debug!(symbol = %req.symbol, limit = req.limit, "fetching yahoo news");

        let response = self.send(&url).await?;
        let body = expect_success(response, "search", &req.symbol)?;
        let mut items = parse_news(&body)?;
        items.truncate(req.limit);
        Ok(items)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn quote_facts<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, QuoteFacts> {
        Box::pin(async move {
            let result = self.fetch_summary(symbol, FACT_MODULES).await?;
            Ok(result.into_quote_facts())
        })
    }

    fn history<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Bar>> {
        Box::pin(async move { self.fetch_history(req).await })
    }

    fn dividends<'a>(&'a self, req: &'a HistoryRequest) -> ProviderFuture<'a, Vec<Dividend>> {
        Box::pin(async move { self.fetch_dividends(req).await })
    }

    fn news<'a>(&'a self, req: &'a NewsRequest) -> ProviderFuture<'a, Vec<NewsItem>> {
        Box::pin(async move { self.fetch_news(req).await })
    }

    fn recommendations<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, RecommendationSummary> {
        Box::pin(async move {
            let result = self.fetch_summary(symbol, RECOMMENDATION_MODULES).await?;
            result
                .recommendation_trend
                .and_then(|trend| trend.trend.into_iter().next())
                .map(YahooTrendEntry::into_summary)
                .ok_or_else(|| {
                    SourceError::unavailable(format!(
                        "yahoo has no recommendation trend for {symbol}"
                    ))
                })
        })
    }

    fn financial_statements<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> ProviderFuture<'a, FinancialStatements> {
        Box::pin(async move {
            let statements = self
                .fetch_summary(symbol, FINANCIAL_MODULES)
                .await?
                .into_financial_statements();
            if statements.is_empty() {
                return Err(SourceError::unavailable(format!(
                    "yahoo has no financial statements for {symbol}"
                )));
            }
            Ok(statements)
        })
    }

    fn calendar_events<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CalendarEvents> {
        Box::pin(async move {
            self.fetch_summary(symbol, CALENDAR_MODULES)
                .await?
                .calendar_events
                .map(YahooCalendarEvents::into_calendar_events)
                .filter(|events| !events.is_empty())
                .ok_or_else(|| {
                    SourceError::unavailable(format!("yahoo has no calendar events for {symbol}"))
                })
        })
    }
}

fn chart_window(range: HistoryRange) -> String {
    match range {
        HistoryRange::Period { period } => format!("range={}", period.as_str()),
        HistoryRange::Dates { dates } => {
            let (start, end) = dates.unix_bounds();
            format!(
                "period1={}&period2={}",
                start - RANGE_PADDING_SECS,
                end + RANGE_PADDING_SECS
            )
        }
    }
}

fn in_range(range: HistoryRange, date: UtcDateTime, utc_offset_secs: i32) -> bool {
    match range {
        HistoryRange::Period { .. } => true,
        HistoryRange::Dates { dates } => {
            dates.contains_at_offset(date.into_inner(), utc_offset_secs)
        }
    }
}

fn with_crumb(url: &str, crumb: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}crumb={}", urlencoding::encode(crumb))
}

/// Maps HTTP status to the provider error taxonomy.
fn expect_success(
    response: HttpResponse,
    endpoint: &str,
    symbol: &Symbol,
) -> Result<String, SourceError> {
    match response.status {
        status if (200..300).contains(&status) => Ok(response.body),
        404 => Err(SourceError::not_found(format!(
            "yahoo {endpoint} does not know symbol {symbol}"
        ))),
        429 => Err(SourceError::rate_limited(format!(
            "yahoo {endpoint} rate limited the request"
        ))),
        status => Err(SourceError::unavailable(format!(
            "yahoo {endpoint} returned status {status}"
        ))),
    }
}

fn api_error(error: Option<YahooApiError>, endpoint: &str) -> Result<(), SourceError> {
    let Some(error) = error else {
        return Ok(());
    };

    let description = error.description.unwrap_or_default();
    if error.code.eq_ignore_ascii_case("not found") {
        return Err(SourceError::not_found(format!(
            "yahoo {endpoint}: {description}"
        )));
    }
    Err(SourceError::unavailable(format!(
        "yahoo {endpoint} error {}: {description}",
        error.code
    )))
}

fn decode_chart(body: &str, symbol: &Symbol) -> Result<YahooChartResult, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;
    api_error(response.chart.error, "chart")?;

    response
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| {
            SourceError::not_found(format!("yahoo chart returned no result for {symbol}"))
        })
}

fn chart_bars(
    chart: YahooChartResult,
    symbol: &Symbol,
    range: HistoryRange,
) -> Result<Vec<Bar>, SourceError> {
    let utc_offset = chart.utc_offset_secs();
    let Some(timestamps) = chart.timestamp else {
        // A valid symbol with no trades in the requested window.
        return Ok(Vec::new());
    };
    let Some(quote) = chart.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts_value) in timestamps.iter().enumerate() {
        let date = UtcDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| SourceError::internal(format!("invalid chart timestamp: {e}")))?;
        if !in_range(range, date, utc_offset) {
            continue;
        }

        let value = |series: &[Option<f64>]| series.get(i).copied().flatten();
        if let (Some(open), Some(high), Some(low), Some(close)) = (
            value(&quote.open),
            value(&quote.high),
            value(&quote.low),
            value(&quote.close),
        ) {
            let volume = quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok());

            match Bar::new(date, open, high, low, close, volume) {
                Ok(bar) => bars.push(bar),
                Err(error) => debug!(%symbol, %date, %error, "dropping malformed bar"),
            }
        }
    }

    Ok(bars)
}

fn chart_dividends(
    chart: YahooChartResult,
    symbol: &Symbol,
    range: HistoryRange,
) -> Vec<Dividend> {
    let utc_offset = chart.utc_offset_secs();
    let events = chart.events.map(|events| events.dividends).unwrap_or_default();

    let mut dividends = events
        .into_iter()
        .filter_map(|(key, event)| {
            let seconds = event.date.or_else(|| key.parse().ok())?;
            let date = UtcDateTime::from_unix_timestamp(seconds).ok()?;
            match Dividend::new(date, event.amount?) {
                Ok(dividend) => Some(dividend),
                Err(error) => {
                    debug!(%symbol, %date, %error, "dropping malformed dividend");
                    None
                }
            }
        })
        .filter(|dividend| in_range(range, dividend.date, utc_offset))
        .collect::<Vec<_>>();
    dividends.sort_by_key(|dividend| dividend.date);
    dividends
}

fn parse_summary(body: &str, symbol: &Symbol) -> Result<YahooSummaryResult, SourceError> {
    let response: YahooQuoteSummaryResponse = serde_json::from_str(body).map_err(|e| {
        SourceError::internal(format!("failed to parse yahoo quoteSummary: {e}"))
    })?;
    api_error(response.quote_summary.error, "quoteSummary")?;

    response
        .quote_summary
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| {
            SourceError::not_found(format!("yahoo quoteSummary has no result for {symbol}"))
        })
}

fn parse_news(body: &str) -> Result<Vec<NewsItem>, SourceError> {
    let response: YahooSearchResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo search: {e}")))?;

    Ok(response
        .news
        .into_iter()
        .filter_map(YahooNewsArticle::into_news_item)
        .collect())
}

/// First candidate that is present and not blank.
fn first_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
}

// ============================================================================
// Yahoo response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
    #[serde(default)]
    events: Option<YahooChartEvents>,
}

impl YahooChartResult {
    /// Exchange offset east of UTC, zero when Yahoo omits it.
    fn utc_offset_secs(&self) -> i32 {
        self.meta
            .as_ref()
            .and_then(|meta| meta.gmtoffset)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartEvents {
    #[serde(default)]
    dividends: BTreeMap<String, YahooDividendEvent>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooDividendEvent {
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    date: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooSummaryResult {
    #[serde(default)]
    price: Option<YahooPrice>,
    #[serde(default)]
    summary_detail: Option<YahooSummaryDetail>,
    #[serde(default)]
    asset_profile: Option<YahooAssetProfile>,
    #[serde(default)]
    financial_data: Option<YahooFinancialData>,
    #[serde(default)]
    recommendation_trend: Option<YahooRecommendationTrend>,
    #[serde(default)]
    income_statement_history: Option<YahooIncomeStatementHistory>,
    #[serde(default)]
    balance_sheet_history: Option<YahooBalanceSheetHistory>,
    #[serde(default)]
    cashflow_statement_history: Option<YahooCashflowStatementHistory>,
    #[serde(default)]
    calendar_events: Option<YahooCalendarEvents>,
}

impl YahooSummaryResult {
    fn into_quote_facts(self) -> QuoteFacts {
        let price = self.price.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let profile = self.asset_profile.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();

        QuoteFacts {
            company_name: price.long_name.or(price.short_name),
            current_price: raw(&financial.current_price).or_else(|| raw(&price.regular_market_price)),
            currency: price.currency.or(detail.currency),
            market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
            pe_ratio: raw(&detail.trailing_pe),
            dividend_yield: raw(&detail.dividend_yield),
            fifty_two_week_high: raw(&detail.fifty_two_week_high),
            fifty_two_week_low: raw(&detail.fifty_two_week_low),
            sector: profile.sector,
            industry: profile.industry,
        }
    }

    fn into_financial_statements(self) -> FinancialStatements {
        FinancialStatements {
            income_statements: self
                .income_statement_history
                .map(|history| history.income_statement_history)
                .unwrap_or_default()
                .into_iter()
                .map(YahooIncomeStatement::into_statement)
                .collect(),
            balance_sheets: self
                .balance_sheet_history
                .map(|history| history.balance_sheet_statements)
                .unwrap_or_default()
                .into_iter()
                .map(YahooBalanceSheet::into_statement)
                .collect(),
            cash_flows: self
                .cashflow_statement_history
                .map(|history| history.cashflow_statements)
                .unwrap_or_default()
                .into_iter()
                .map(YahooCashflowStatement::into_statement)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooPrice {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooSummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<YahooRawValue>,
    #[serde(default)]
    dividend_yield: Option<YahooRawValue>,
    #[serde(default)]
    fifty_two_week_high: Option<YahooRawValue>,
    #[serde(default)]
    fifty_two_week_low: Option<YahooRawValue>,
    #[serde(default)]
    market_cap: Option<YahooRawValue>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooAssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooFinancialData {
    #[serde(default)]
    current_price: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooRecommendationTrend {
    #[serde(default)]
    trend: Vec<YahooTrendEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooTrendEntry {
    #[serde(default)]
    strong_buy: u32,
    #[serde(default)]
    buy: u32,
    #[serde(default)]
    hold: u32,
    #[serde(default)]
    sell: u32,
    #[serde(default)]
    strong_sell: u32,
}

impl YahooTrendEntry {
    fn into_summary(self) -> RecommendationSummary {
        RecommendationSummary::new(
            self.strong_buy,
            self.buy,
            self.hold,
            self.sell,
            self.strong_sell,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooIncomeStatementHistory {
    #[serde(default)]
    income_statement_history: Vec<YahooIncomeStatement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooIncomeStatement {
    #[serde(default)]
    end_date: Option<YahooRawValue>,
    #[serde(default)]
    total_revenue: Option<YahooRawValue>,
    #[serde(default)]
    gross_profit: Option<YahooRawValue>,
    #[serde(default)]
    operating_income: Option<YahooRawValue>,
    #[serde(default)]
    net_income: Option<YahooRawValue>,
}

impl YahooIncomeStatement {
    fn into_statement(self) -> IncomeStatement {
        IncomeStatement {
            period_end: raw_date(&self.end_date),
            total_revenue: raw(&self.total_revenue),
            gross_profit: raw(&self.gross_profit),
            operating_income: raw(&self.operating_income),
            net_income: raw(&self.net_income),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooBalanceSheetHistory {
    #[serde(default)]
    balance_sheet_statements: Vec<YahooBalanceSheet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooBalanceSheet {
    #[serde(default)]
    end_date: Option<YahooRawValue>,
    #[serde(default)]
    total_assets: Option<YahooRawValue>,
    #[serde(rename = "totalLiab", default)]
    total_liabilities: Option<YahooRawValue>,
    #[serde(default)]
    total_stockholder_equity: Option<YahooRawValue>,
    #[serde(default)]
    cash: Option<YahooRawValue>,
    #[serde(default)]
    total_current_assets: Option<YahooRawValue>,
    #[serde(default)]
    total_current_liabilities: Option<YahooRawValue>,
}

impl YahooBalanceSheet {
    fn into_statement(self) -> BalanceSheet {
        BalanceSheet {
            period_end: raw_date(&self.end_date),
            total_assets: raw(&self.total_assets),
            total_liabilities: raw(&self.total_liabilities),
            stockholder_equity: raw(&self.total_stockholder_equity),
            cash: raw(&self.cash),
            current_assets: raw(&self.total_current_assets),
            current_liabilities: raw(&self.total_current_liabilities),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooCashflowStatementHistory {
    #[serde(default)]
    cashflow_statements: Vec<YahooCashflowStatement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooCashflowStatement {
    #[serde(default)]
    end_date: Option<YahooRawValue>,
    #[serde(default)]
    total_cash_from_operating_activities: Option<YahooRawValue>,
    #[serde(default)]
    capital_expenditures: Option<YahooRawValue>,
    #[serde(default)]
    free_cash_flow: Option<YahooRawValue>,
    #[serde(default)]
    dividends_paid: Option<YahooRawValue>,
}

impl YahooCashflowStatement {
    fn into_statement(self) -> CashFlowStatement {
        CashFlowStatement {
            period_end: raw_date(&self.end_date),
            operating_cash_flow: raw(&self.total_cash_from_operating_activities),
            capital_expenditures: raw(&self.capital_expenditures),
            free_cash_flow: raw(&self.free_cash_flow),
            dividends_paid: raw(&self.dividends_paid),
        }
        .with_derived_free_cash_flow()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooCalendarEvents {
    #[serde(default)]
    earnings: Option<YahooEarnings>,
    #[serde(default)]
    ex_dividend_date: Option<YahooRawValue>,
    #[serde(default)]
    dividend_date: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooEarnings {
    #[serde(default)]
    earnings_date: Vec<YahooRawValue>,
    #[serde(default)]
    earnings_average: Option<YahooRawValue>,
    #[serde(default)]
    earnings_low: Option<YahooRawValue>,
    #[serde(default)]
    earnings_high: Option<YahooRawValue>,
    #[serde(default)]
    revenue_average: Option<YahooRawValue>,
}

impl YahooCalendarEvents {
    fn into_calendar_events(self) -> CalendarEvents {
        let earnings = self.earnings.unwrap_or_default();
        let mut earnings_dates = earnings
            .earnings_date
            .into_iter()
            .filter_map(|value| raw_date(&Some(value)))
            .collect::<Vec<_>>();
        earnings_dates.sort();

        CalendarEvents {
            earnings_dates,
            earnings_average: raw(&earnings.earnings_average),
            earnings_low: raw(&earnings.earnings_low),
            earnings_high: raw(&earnings.earnings_high),
            revenue_average: raw(&earnings.revenue_average),
            ex_dividend_date: raw_date(&self.ex_dividend_date),
            dividend_date: raw_date(&self.dividend_date),
        }
    }
}

/// Yahoo wraps numbers as `{"raw": 1.5, "fmt": "1.50"}` and sends `{}` when
/// it has no value.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

/// Unwraps a raw value. Zero is a real value; only NaN and infinities are
/// treated as missing.
fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    value
        .as_ref()
        .and_then(|value| value.raw)
        .filter(|v| v.is_finite())
}

/// Unwraps a raw value holding unix seconds.
fn raw_date(value: &Option<YahooRawValue>) -> Option<UtcDateTime> {
    raw(value).and_then(|seconds| UtcDateTime::from_unix_timestamp(seconds as i64).ok())
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsArticle>,
}

/// Search results carry flat fields; some feeds nest them under `content`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooNewsArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    provider_publish_time: Option<i64>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<YahooNewsContent>,
}

impl YahooNewsArticle {
    /// Skips articles without a title. The summary falls back through
    /// summary, description, intro and excerpt and is never shortened.
    fn into_news_item(self) -> Option<NewsItem> {
        let content = self.content.unwrap_or_default();

        let title = first_text([self.title, content.title])?;
        let summary = first_text([
            self.summary,
            self.description,
            content.summary,
            content.description,
            content.intro,
            content.excerpt,
        ])
        .unwrap_or_default();
        let link = first_text([
            self.link,
            content.canonical_url.and_then(YahooNewsLink::into_url),
            content.click_through_url.and_then(YahooNewsLink::into_url),
        ]);
        let publisher = first_text([
            self.publisher,
            content.provider.and_then(|provider| provider.display_name),
        ]);
        let published_at = self
            .provider_publish_time
            .and_then(|seconds| UtcDateTime::from_unix_timestamp(seconds).ok())
            .or_else(|| {
                content
                    .pub_date
                    .and_then(|date| UtcDateTime::parse(&date).ok())
            });

        Some(NewsItem {
            title,
            publisher,
            link,
            published_at,
            summary,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooNewsContent {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    canonical_url: Option<YahooNewsLink>,
    #[serde(default)]
    click_through_url: Option<YahooNewsLink>,
    #[serde(default)]
    provider: Option<YahooNewsProvider>,
    #[serde(default)]
    pub_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum YahooNewsLink {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl YahooNewsLink {
    fn into_url(self) -> Option<String> {
        match self {
            Self::Url(url) => Some(url),
            Self::Object { url } => url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooNewsProvider {
    #[serde(default)]
    display_name: Option<String>,
}
