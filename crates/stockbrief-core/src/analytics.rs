//! Statistics derived from a [`PriceSeries`].
//!
//! Every function is total: an input too short to define a value yields
//! `None`, never `0.0`. Zero is a legitimate price change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::PriceSeries;

/// Percentage change from the first close to the last close.
///
/// Undefined for fewer than two bars or a zero first close.
pub fn change_pct(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let first = series.first()?.close;
    let last = series.last()?.close;
    percent_change(first, last)
}

fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Simple moving average aligned with `values`.
///
/// The first `window - 1` entries are `None`; a window of zero or longer
/// than the input yields all `None`.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }
            Some((i + 1 >= window).then(|| *sum / window as f64))
        })
        .collect()
}

/// Moving averages of the closes for every requested window.
pub fn moving_averages(
    series: &PriceSeries,
    windows: &BTreeSet<usize>,
) -> BTreeMap<usize, Vec<Option<f64>>> {
    let closes = series.closes();
    windows
        .iter()
        .map(|&window| (window, simple_moving_average(&closes, window)))
        .collect()
}

pub fn min_close(series: &PriceSeries) -> Option<f64> {
    series.bars().iter().map(|bar| bar.close).reduce(f64::min)
}

pub fn max_close(series: &PriceSeries) -> Option<f64> {
    series.bars().iter().map(|bar| bar.close).reduce(f64::max)
}

/// Sample standard deviation (n - 1) of close-to-close returns, in percent.
pub fn volatility_pct(series: &PriceSeries) -> Option<f64> {
    let returns = series
        .bars()
        .windows(2)
        .filter(|pair| pair[0].close != 0.0)
        .map(|pair| (pair[1].close - pair[0].close) / pair[0].close)
        .collect::<Vec<_>>();

    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * 100.0)
}

/// Summary statistics over a price window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub current_price: Option<f64>,
    pub start_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub daily_change: Option<f64>,
    pub daily_change_pct: Option<f64>,
    pub period_high: Option<f64>,
    pub period_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub total_volume: Option<u64>,
    pub trading_days: usize,
    pub volatility_pct: Option<f64>,
}

impl PriceStatistics {
    pub fn from_series(series: &PriceSeries) -> Self {
        let bars = series.bars();
        let current_price = series.last().map(|bar| bar.close);
        let previous_close = bars.len().checked_sub(2).map(|i| bars[i].close);

        let daily_change = current_price
            .zip(previous_close)
            .map(|(current, previous)| current - previous);
        let daily_change_pct = current_price
            .zip(previous_close)
            .and_then(|(current, previous)| percent_change(previous, current));

        let volumes = bars.iter().filter_map(|bar| bar.volume).collect::<Vec<_>>();
        let total_volume = (!volumes.is_empty()).then(|| volumes.iter().sum::<u64>());
        let average_volume = total_volume.map(|total| total as f64 / volumes.len() as f64);

        Self {
            current_price,
            start_price: series.first().map(|bar| bar.close),
            previous_close,
            daily_change,
            daily_change_pct,
            period_high: bars.iter().map(|bar| bar.high).reduce(f64::max),
            period_low: bars.iter().map(|bar| bar.low).reduce(f64::min),
            average_volume,
            total_volume,
            trading_days: bars.len(),
            volatility_pct: volatility_pct(series),
        }
    }
}

/// Direction of the latest close relative to its moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Mixed,
}

impl TrendSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Mixed => "mixed",
        }
    }

    /// Compares the latest close with the latest value of each average.
    /// Windows that are still undefined at the last bar are skipped.
    pub fn classify(
        series: &PriceSeries,
        moving_averages: &BTreeMap<usize, Vec<Option<f64>>>,
    ) -> Option<Self> {
        let close = series.last()?.close;
        let latest = moving_averages
            .values()
            .filter_map(|values| values.last().copied().flatten())
            .collect::<Vec<_>>();

        if latest.is_empty() {
            return None;
        }

        let above = latest.iter().filter(|&&average| close > average).count();
        Some(match above {
            0 => Self::Bearish,
            n if n == latest.len() => Self::Bullish,
            _ => Self::Mixed,
        })
    }
}

/// Everything computed from the price series of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub change_pct: Option<f64>,
    pub moving_averages: BTreeMap<usize, Vec<Option<f64>>>,
    pub min_close: Option<f64>,
    pub max_close: Option<f64>,
    pub price_statistics: PriceStatistics,
    pub trend_signal: Option<TrendSignal>,
}

impl DerivedStats {
    pub fn compute(series: &PriceSeries, windows: &BTreeSet<usize>) -> Self {
        let moving_averages = moving_averages(series, windows);
        let trend_signal = TrendSignal::classify(series, &moving_averages);

        Self {
            change_pct: change_pct(series),
            min_close: min_close(series),
            max_close: max_close(series),
            price_statistics: PriceStatistics::from_series(series),
            trend_signal,
            moving_averages,
        }
    }
}
