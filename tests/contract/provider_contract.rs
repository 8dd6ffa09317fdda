//! Contract tests for the Yahoo provider
//!
//! Every endpoint must map upstream failures onto the same error taxonomy,
//! and the report builder must absorb those failures into absent fields.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stockbrief_core::{
    AbsenceKind, HistoryRequest, HttpClient, HttpError, HttpRequest, HttpResponse, Interval,
    MarketDataProvider, NewsRequest, Period, ProviderConfig, ReportBuilder, ReportOptions,
    SourceError, SourceErrorKind, Symbol, YahooProvider,
};

/// Answers every request with the same response, unless a route matching
/// the URL overrides it, and records URLs.
struct FixedHttpClient {
    response: Result<HttpResponse, HttpError>,
    auth: HttpResponse,
    routes: Vec<(&'static str, HttpResponse)>,
    urls: Mutex<Vec<String>>,
}

impl FixedHttpClient {
    fn new(response: Result<HttpResponse, HttpError>) -> Self {
        Self {
            response,
            auth: HttpResponse::ok_json("crumb-token"),
            routes: Vec::new(),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn with_route(mut self, needle: &'static str, response: HttpResponse) -> Self {
        self.routes.push((needle, response));
        self
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("urls lock").clone()
    }
}

impl HttpClient for FixedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.urls.lock().expect("urls lock").push(request.url.clone());
        let routed = self
            .routes
            .iter()
            .find(|(needle, _)| request.url.contains(needle))
            .map(|(_, response)| Ok(response.clone()));
        let response = if request.url.contains("getcrumb") || request.url.contains("fc.yahoo") {
            Ok(self.auth.clone())
        } else {
            routed.unwrap_or_else(|| self.response.clone())
        };
        Box::pin(async move { response })
    }
}

fn provider_with(response: Result<HttpResponse, HttpError>) -> (Arc<FixedHttpClient>, YahooProvider) {
    provider_over(FixedHttpClient::new(response))
}

fn provider_over(client: FixedHttpClient) -> (Arc<FixedHttpClient>, YahooProvider) {
    let client = Arc::new(client);
    let provider = YahooProvider::with_http_client(client.clone(), ProviderConfig::default());
    (client, provider)
}

const ENDPOINTS: usize = 7;

fn symbol() -> Symbol {
    Symbol::parse("AAPL").expect("valid symbol")
}

/// Runs every endpoint and returns the error kind of each.
async fn error_kinds(provider: &dyn MarketDataProvider) -> Vec<SourceErrorKind> {
    let symbol = symbol();
    let history = HistoryRequest::new(symbol.clone(), Period::OneMonth, Interval::OneDay);
    let news = NewsRequest::new(symbol.clone(), 5).expect("valid news request");

    vec![
        provider
            .quote_facts(&symbol)
            .await
            .map(|_| ())
            .map_err(|e| e.kind()),
        provider.history(&history).await.map(|_| ()).map_err(|e| e.kind()),
        provider.news(&news).await.map(|_| ()).map_err(|e| e.kind()),
        provider
            .recommendations(&symbol)
            .await
            .map(|_| ())
            .map_err(|e| e.kind()),
        provider.dividends(&history).await.map(|_| ()).map_err(|e| e.kind()),
        provider
            .financial_statements(&symbol)
            .await
            .map(|_| ())
            .map_err(|e| e.kind()),
        provider
            .calendar_events(&symbol)
            .await
            .map(|_| ())
            .map_err(|e| e.kind()),
    ]
    .into_iter()
    .map(|result| result.expect_err("every endpoint should fail"))
    .collect()
}

// =============================================================================
// Contract: Error Taxonomy
// =============================================================================

#[tokio::test]
async fn http_404_maps_to_not_found_on_every_endpoint() {
    let (_, provider) = provider_with(Ok(HttpResponse::new(404, "")));
    assert_eq!(
        error_kinds(&provider).await,
        vec![SourceErrorKind::NotFound; ENDPOINTS]
    );
}

#[tokio::test]
async fn http_429_maps_to_rate_limited_on_every_endpoint() {
    let (_, provider) = provider_with(Ok(HttpResponse::new(429, "Too Many Requests")));
    assert_eq!(
        error_kinds(&provider).await,
        vec![SourceErrorKind::RateLimited; ENDPOINTS]
    );
}

#[tokio::test]
async fn server_and_transport_errors_map_to_unavailable() {
    let (_, provider) = provider_with(Ok(HttpResponse::new(502, "bad gateway")));
    assert_eq!(
        error_kinds(&provider).await,
        vec![SourceErrorKind::Unavailable; ENDPOINTS]
    );

    let (_, provider) = provider_with(Err(HttpError::new("connection refused")));
    assert_eq!(
        error_kinds(&provider).await,
        vec![SourceErrorKind::Unavailable; ENDPOINTS]
    );
}

#[tokio::test]
async fn undecodable_bodies_map_to_internal() {
    let (_, provider) = provider_with(Ok(HttpResponse::ok_json("{not json")));
    assert_eq!(
        error_kinds(&provider).await,
        vec![SourceErrorKind::Internal; ENDPOINTS]
    );
}

#[tokio::test]
async fn yahoo_not_found_body_maps_to_not_found() {
    let (_, provider) = provider_with(Ok(HttpResponse::ok_json(
        r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: AAPL"}}}"#,
    )));

    let error: SourceError = provider
        .quote_facts(&symbol())
        .await
        .expect_err("not found body must fail");
    assert_eq!(error.kind(), SourceErrorKind::NotFound);
    assert!(error.message().contains("Quote not found"));
}

#[tokio::test]
async fn provider_name_is_stable() {
    let (_, provider) = provider_with(Ok(HttpResponse::new(500, "")));
    assert_eq!(provider.name(), "yahoo");
}

// =============================================================================
// Contract: Report Builder Over Yahoo
// =============================================================================

#[tokio::test]
async fn unknown_symbol_produces_not_found_report_not_an_error() {
    // Given: Yahoo answers 404 for everything
    let (client, provider) = provider_with(Ok(HttpResponse::new(404, "")));
    let builder = ReportBuilder::new(Arc::new(provider));

    // When: A report is built for a symbol Yahoo does not know
    let report = builder
        .build("NOPE", &ReportOptions::default())
        .await
        .expect("provider failures never fail the report");

    // Then: Every field is NotFound and the report says so
    assert!(report.is_not_found());
    assert_eq!(
        report.price_series().absence().map(|a| a.kind),
        Some(AbsenceKind::NotFound)
    );
    assert!(report
        .notes()
        .iter()
        .any(|note| note.contains("not recognized by yahoo")));
    assert!(client.urls().iter().any(|url| url.contains("/v8/finance/chart/NOPE")));
}

#[tokio::test]
async fn unknown_symbol_is_detected_even_when_search_answers_empty() {
    // Given: Chart and quoteSummary answer 404, search answers an empty list
    let (_, provider) = provider_over(
        FixedHttpClient::new(Ok(HttpResponse::new(404, "")))
            .with_route("/v1/finance/search", HttpResponse::ok_json(r#"{"news":[]}"#)),
    );
    let builder = ReportBuilder::new(Arc::new(provider));

    // When: A default report is built for the unknown symbol
    let report = builder
        .build("NOPE", &ReportOptions::default())
        .await
        .expect("provider failures never fail the report");

    // Then: News is present but empty, and the symbol is still unknown
    assert_eq!(report.news().value().map(Vec::len), Some(0));
    assert!(report.is_not_found());
    assert!(report
        .notes()
        .iter()
        .any(|note| note == "symbol NOPE was not recognized by yahoo"));
}

#[tokio::test]
async fn stats_style_report_only_touches_the_chart_endpoint() {
    let (client, provider) = provider_with(Ok(HttpResponse::new(503, "")));
    let builder = ReportBuilder::new(Arc::new(provider));

    builder
        .build("AAPL", &ReportOptions::default().history_only())
        .await
        .expect("report should build");

    let urls = client.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("/v8/finance/chart/AAPL"));
    assert!(!urls[0].contains("events=div"));
}

#[tokio::test]
async fn zero_news_limit_never_reaches_the_search_endpoint() {
    let (client, provider) = provider_with(Ok(HttpResponse::new(503, "")));
    let builder = ReportBuilder::new(Arc::new(provider));

    builder
        .build("AAPL", &ReportOptions::default().with_news_limit(0))
        .await
        .expect("report should build");

    assert!(!client
        .urls()
        .iter()
        .any(|url| url.contains("/v1/finance/search")));
}
