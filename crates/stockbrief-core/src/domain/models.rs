use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// OHLCV bar for one interval bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    pub fn new(
        date: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Bars ordered strictly by ascending date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(Vec<Bar>);

impl PriceSeries {
    /// Sorts by date and drops duplicate dates, keeping the last bar seen
    /// for each date.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.reverse();
        // Stable sort keeps the reversed order among equal dates, so the
        // first of each run is the bar that arrived last.
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);
        Self(bars)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.0.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|bar| bar.close).collect()
    }
}

/// Point-in-time descriptive and valuation fields for a company.
///
/// Every field is optional; a missing value stays `None` rather than
/// becoming zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteFacts {
    pub company_name: Option<String>,
    pub current_price: Option<f64>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl QuoteFacts {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// News article attached to a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<UtcDateTime>,
    /// Full provider text, never truncated.
    pub summary: String,
}

/// Latest analyst recommendation counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
    pub total: u32,
    /// Share of strong buy + buy among all analysts, in percent.
    pub buy_ratio: Option<f64>,
}

impl RecommendationSummary {
    pub fn new(strong_buy: u32, buy: u32, hold: u32, sell: u32, strong_sell: u32) -> Self {
        let total = [buy, hold, sell, strong_sell]
            .into_iter()
            .fold(strong_buy, u32::saturating_add);
        let buy_side = strong_buy.saturating_add(buy);
        let buy_ratio = (total > 0).then(|| f64::from(buy_side) / f64::from(total) * 100.0);

        Self {
            strong_buy,
            buy,
            hold,
            sell,
            strong_sell,
            total,
            buy_ratio,
        }
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(seconds: i64, close: f64) -> Bar {
        let date = UtcDateTime::from_unix_timestamp(seconds).expect("timestamp");
        Bar::new(date, close, close, close, close, Some(100)).expect("valid bar")
    }

    #[test]
    fn rejects_invalid_bar_bounds() {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        let err = Bar::new(ts, 10.0, 12.0, 9.0, 12.5, Some(10)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_non_finite_prices() {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        let err = Bar::new(ts, f64::NAN, 12.0, 9.0, 10.0, None).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "open" }));
    }

    #[test]
    fn price_series_sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::new(vec![
            bar_at(300, 3.0),
            bar_at(100, 1.0),
            bar_at(200, 2.0),
            bar_at(100, 1.5),
        ]);

        assert_eq!(series.closes(), vec![1.5, 2.0, 3.0]);
        assert!(series
            .bars()
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn recommendation_ratio_is_undefined_without_analysts() {
        let empty = RecommendationSummary::new(0, 0, 0, 0, 0);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.buy_ratio, None);

        let summary = RecommendationSummary::new(5, 10, 8, 1, 1);
        assert_eq!(summary.total, 25);
        assert_eq!(summary.buy_ratio, Some(60.0));
    }

    #[test]
    fn recommendation_counts_saturate_instead_of_overflowing() {
        let summary = RecommendationSummary::new(u32::MAX, u32::MAX, 1, 0, 0);
        assert_eq!(summary.total, u32::MAX);
        assert_eq!(summary.buy_ratio, Some(100.0));
    }

    #[test]
    fn default_quote_facts_are_absent_not_zero() {
        let facts = QuoteFacts::default();
        assert!(facts.is_empty());
        assert_eq!(facts.market_cap, None);
    }
}
