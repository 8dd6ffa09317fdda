//! Human-readable projections of reports. Absent values print as `N/A`.

use stockbrief_core::{
    format_date, AbsenceKind, CalendarEvents, Comparison, DerivedStats, Dividend, Field,
    FinancialStatements, NewsItem, PriceSeries, QuoteFacts, RecommendationSummary, StockReport,
    UtcDateTime,
};

const NA: &str = "N/A";

pub fn report(report: &StockReport) -> String {
    let mut lines = vec![header(report)];

    lines.push(String::new());
    lines.extend(quote_facts(report.quote_facts()));
    lines.push(String::new());
    lines.extend(price_overview(report.price_series()));
    lines.extend(derived_stats(report.derived_stats()));
    lines.push(String::new());
    lines.extend(recommendations(report.recommendations()));
    lines.extend(dividends(report.dividends()));
    lines.extend(financials(report.financial_statements()));
    lines.extend(calendar(report.calendar_events()));
    lines.push(String::new());
    lines.extend(news_items(report.news()));

    lines.join("\n")
}

pub fn news(report: &StockReport) -> String {
    let mut lines = vec![format!("{} news (source: {})", report.symbol(), report.source())];
    lines.push(String::new());
    lines.extend(news_items(report.news()));
    lines.join("\n")
}

pub fn stats(report: &StockReport) -> String {
    let mut lines = vec![header(report)];
    lines.push(String::new());
    lines.extend(price_overview(report.price_series()));
    lines.extend(derived_stats(report.derived_stats()));
    lines.join("\n")
}

pub fn comparison(comparison: &Comparison) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<10} {:>10} {:>12} {:>12}",
        "#", "symbol", "change", "final", "volatility"
    )];

    for entry in &comparison.entries {
        lines.push(format!(
            "{:<4} {:<10} {:>10} {:>12} {:>12}",
            entry.rank,
            entry.symbol.as_str(),
            signed_pct(Some(entry.change_pct)),
            price(entry.final_close),
            pct(entry.volatility_pct),
        ));
    }
    for excluded in &comparison.excluded {
        lines.push(format!(
            "{:<4} {:<10} {:>10} ({})",
            "-",
            excluded.symbol.as_str(),
            NA,
            excluded.reason
        ));
    }

    let summary = &comparison.summary;
    lines.push(String::new());
    lines.push(format!(
        "Best performer : {} ({})",
        or_na(summary.best_performer.as_ref().map(|s| s.as_str())),
        signed_pct(summary.best_change_pct)
    ));
    lines.push(format!(
        "Worst performer: {} ({})",
        or_na(summary.worst_performer.as_ref().map(|s| s.as_str())),
        signed_pct(summary.worst_change_pct)
    ));
    lines.push(format!(
        "Average change : {} over {} of {} symbols",
        signed_pct(summary.average_change_pct),
        summary.ranked,
        summary.requested
    ));

    lines.join("\n")
}

fn header(report: &StockReport) -> String {
    let options = report.options();
    format!(
        "{} (source: {}, range {}, interval {})",
        report.symbol(),
        report.source(),
        options.range.label(),
        options.interval.as_str()
    )
}

fn quote_facts(field: &Field<QuoteFacts>) -> Vec<String> {
    let empty = QuoteFacts::default();
    let facts = field.value().unwrap_or(&empty);
    let currency = facts.currency.as_deref().map(|c| format!(" {c}")).unwrap_or_default();

    let mut lines = vec![
        format!("Company        : {}", or_na(facts.company_name.as_deref())),
        format!(
            "Current price  : {}{}",
            price(facts.current_price),
            facts.current_price.map(|_| currency.as_str()).unwrap_or("")
        ),
        format!("Market cap     : {}", large_number(facts.market_cap)),
        format!("P/E ratio      : {}", price(facts.pe_ratio)),
        format!(
            "Dividend yield : {}",
            pct(facts.dividend_yield.map(|fraction| fraction * 100.0))
        ),
        format!(
            "52-week range  : {} - {}",
            price(facts.fifty_two_week_low),
            price(facts.fifty_two_week_high)
        ),
        format!("Sector         : {}", or_na(facts.sector.as_deref())),
        format!("Industry       : {}", or_na(facts.industry.as_deref())),
    ];
    if let Some(absence) = field.absence() {
        lines.push(format!("  ({})", absence.message));
    }
    lines
}

fn price_overview(field: &Field<PriceSeries>) -> Vec<String> {
    match field {
        Field::Present(series) => match (series.first(), series.last()) {
            (Some(first), Some(last)) => vec![format!(
                "Price series   : {} bars, {} to {}",
                series.len(),
                format_date(first.date.into_inner().date()),
                format_date(last.date.into_inner().date())
            )],
            _ => vec![String::from("Price series   : no bars")],
        },
        Field::Absent(absence) => vec![format!("Price series   : {NA} ({})", absence.message)],
    }
}

fn derived_stats(stats: &DerivedStats) -> Vec<String> {
    let prices = &stats.price_statistics;
    let mut lines = vec![
        format!("Change         : {}", signed_pct(stats.change_pct)),
        format!(
            "Close min/max  : {} / {}",
            price(stats.min_close),
            price(stats.max_close)
        ),
        format!(
            "Period hi/lo   : {} / {}",
            price(prices.period_high),
            price(prices.period_low)
        ),
        format!(
            "Last close     : {} ({} on the day)",
            price(prices.current_price),
            signed_pct(prices.daily_change_pct)
        ),
        format!("Avg volume     : {}", large_number(prices.average_volume)),
        format!("Volatility     : {}", pct(prices.volatility_pct)),
    ];

    for (window, values) in &stats.moving_averages {
        let latest = values.last().copied().flatten();
        lines.push(format!("{:<15}: {}", format!("MA({window})"), price(latest)));
    }
    lines.push(format!(
        "Trend          : {}",
        or_na(stats.trend_signal.map(|signal| signal.as_str()))
    ));
    lines
}

fn recommendations(field: &Field<RecommendationSummary>) -> Vec<String> {
    match field {
        Field::Present(summary) => vec![format!(
            "Analysts       : {} strong buy, {} buy, {} hold, {} sell, {} strong sell (buy ratio {})",
            summary.strong_buy,
            summary.buy,
            summary.hold,
            summary.sell,
            summary.strong_sell,
            pct(summary.buy_ratio)
        )],
        Field::Absent(absence) => vec![format!("Analysts       : {NA} ({})", absence.message)],
    }
}

/// One line per field; fields the caller skipped print nothing.
fn fundamentals_line<T>(
    label: &str,
    field: &Field<T>,
    describe: impl FnOnce(&T) -> String,
) -> Vec<String> {
    match field {
        Field::Present(value) => vec![format!("{label:<15}: {}", describe(value))],
        Field::Absent(absence) if absence.kind == AbsenceKind::NotRequested => Vec::new(),
        Field::Absent(absence) => vec![format!("{label:<15}: {NA} ({})", absence.message)],
    }
}

fn dividends(field: &Field<Vec<Dividend>>) -> Vec<String> {
    fundamentals_line("Dividends", field, |dividends| match dividends.last() {
        Some(last) => format!(
            "{} paid, last {} on {}",
            dividends.len(),
            price(Some(last.amount)),
            date(Some(last.date))
        ),
        None => String::from("none in range"),
    })
}

fn financials(field: &Field<FinancialStatements>) -> Vec<String> {
    fundamentals_line("Financials", field, |statements| {
        match statements.latest_income_statement() {
            Some(income) => format!(
                "revenue {}, net income {} (period ending {})",
                large_number(income.total_revenue),
                large_number(income.net_income),
                date(income.period_end)
            ),
            None => String::from("no income statement"),
        }
    })
}

fn calendar(field: &Field<CalendarEvents>) -> Vec<String> {
    fundamentals_line("Next earnings", field, |events| {
        format!(
            "{} (ex-dividend {})",
            date(events.next_earnings_date()),
            date(events.ex_dividend_date)
        )
    })
}

fn date(value: Option<UtcDateTime>) -> String {
    value.map_or_else(|| NA.to_string(), |ts| format_date(ts.into_inner().date()))
}

fn news_items(field: &Field<Vec<NewsItem>>) -> Vec<String> {
    let items = match field {
        Field::Present(items) if items.is_empty() => return vec![String::from("News: none")],
        Field::Present(items) => items,
        Field::Absent(absence) => return vec![format!("News: {NA} ({})", absence.message)],
    };

    let mut lines = vec![String::from("News:")];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {} ({}, {})",
            i + 1,
            item.title,
            or_na(item.publisher.as_deref()),
            item.published_at
                .map(|ts| ts.format_rfc3339())
                .unwrap_or_else(|| NA.to_string())
        ));
        if !item.summary.is_empty() {
            lines.push(format!("     {}", item.summary));
        }
        if let Some(link) = &item.link {
            lines.push(format!("     {link}"));
        }
    }
    lines
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NA)
}

pub(crate) fn price(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.2}"))
}

pub(crate) fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.2}%"))
}

pub(crate) fn signed_pct(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:+.2}%"))
}

pub(crate) fn large_number(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NA.to_string();
    };

    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbrief_core::{ComparisonEntry, ComparisonSummary, ExcludedSymbol, Symbol};

    #[test]
    fn absent_values_print_na() {
        assert_eq!(price(None), "N/A");
        assert_eq!(pct(None), "N/A");
        assert_eq!(signed_pct(None), "N/A");
        assert_eq!(large_number(None), "N/A");
    }

    #[test]
    fn zero_is_not_na() {
        assert_eq!(price(Some(0.0)), "0.00");
        assert_eq!(signed_pct(Some(0.0)), "+0.00%");
    }

    #[test]
    fn large_numbers_are_abbreviated() {
        assert_eq!(large_number(Some(2.9e12)), "2.90T");
        assert_eq!(large_number(Some(3.5e9)), "3.50B");
        assert_eq!(large_number(Some(12_500_000.0)), "12.50M");
        assert_eq!(large_number(Some(950.0)), "950");
    }

    #[test]
    fn skipped_fundamentals_print_nothing() {
        use stockbrief_core::Absence;

        let skipped: Field<FinancialStatements> = Field::Absent(Absence::not_requested());
        assert!(financials(&skipped).is_empty());

        let none: Field<Vec<Dividend>> = Field::Present(Vec::new());
        assert_eq!(dividends(&none), vec!["Dividends      : none in range"]);
    }

    #[test]
    fn comparison_lists_ranked_then_excluded() {
        let symbol = |raw: &str| Symbol::parse(raw).expect("valid symbol");
        let ranked = Comparison {
            entries: vec![
                ComparisonEntry {
                    rank: 1,
                    symbol: symbol("A"),
                    change_pct: 5.0,
                    final_close: Some(105.0),
                    volatility_pct: None,
                },
                ComparisonEntry {
                    rank: 2,
                    symbol: symbol("B"),
                    change_pct: -3.0,
                    final_close: Some(97.0),
                    volatility_pct: Some(1.5),
                },
            ],
            excluded: vec![ExcludedSymbol {
                symbol: symbol("C"),
                reason: String::from("price series unavailable: down"),
            }],
            summary: ComparisonSummary {
                requested: 3,
                ranked: 2,
                best_performer: Some(symbol("A")),
                worst_performer: Some(symbol("B")),
                best_change_pct: Some(5.0),
                worst_change_pct: Some(-3.0),
                average_change_pct: Some(1.0),
            },
        };

        let text = comparison(&ranked);
        let a = text.find("+5.00%").expect("A is listed");
        let b = text.find("-3.00%").expect("B is listed");
        assert!(a < b);
        assert!(text.contains("price series unavailable: down"));
        assert!(text.contains("Best performer : A (+5.00%)"));
        assert!(text.contains("Average change : +1.00% over 2 of 3 symbols"));
    }
}
