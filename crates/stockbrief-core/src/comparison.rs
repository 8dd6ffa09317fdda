//! Ranking of several [`StockReport`]s by percentage change.

use serde::{Deserialize, Serialize};

use crate::report::StockReport;
use crate::Symbol;

/// One ranked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// 1-based position, best first.
    pub rank: usize,
    pub symbol: Symbol,
    pub change_pct: f64,
    pub final_close: Option<f64>,
    pub volatility_pct: Option<f64>,
}

/// Symbol left out of the ranking because its change is undefined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedSymbol {
    pub symbol: Symbol,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub requested: usize,
    pub ranked: usize,
    pub best_performer: Option<Symbol>,
    pub worst_performer: Option<Symbol>,
    pub best_change_pct: Option<f64>,
    pub worst_change_pct: Option<f64>,
    /// Mean change over ranked symbols only.
    pub average_change_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
    pub excluded: Vec<ExcludedSymbol>,
    pub summary: ComparisonSummary,
}

impl Comparison {
    pub fn best(&self) -> Option<&ComparisonEntry> {
        self.entries.first()
    }
}

/// Ranks reports by `change_pct`, descending. Ties keep input order.
///
/// Reports without a defined change are excluded from the ranking and from
/// the average.
pub fn compare_reports(reports: &[StockReport]) -> Comparison {
    let mut entries = Vec::with_capacity(reports.len());
    let mut excluded = Vec::new();

    for report in reports {
        let stats = report.derived_stats();
        match stats.change_pct {
            Some(change_pct) => entries.push(ComparisonEntry {
                rank: 0,
                symbol: report.symbol().clone(),
                change_pct,
                final_close: stats.price_statistics.current_price,
                volatility_pct: stats.price_statistics.volatility_pct,
            }),
            None => excluded.push(ExcludedSymbol {
                symbol: report.symbol().clone(),
                reason: exclusion_reason(report),
            }),
        }
    }

    entries.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    let average_change_pct = (!entries.is_empty()).then(|| {
        entries.iter().map(|entry| entry.change_pct).sum::<f64>() / entries.len() as f64
    });

    let summary = ComparisonSummary {
        requested: reports.len(),
        ranked: entries.len(),
        best_performer: entries.first().map(|entry| entry.symbol.clone()),
        worst_performer: entries.last().map(|entry| entry.symbol.clone()),
        best_change_pct: entries.first().map(|entry| entry.change_pct),
        worst_change_pct: entries.last().map(|entry| entry.change_pct),
        average_change_pct,
    };

    Comparison {
        entries,
        excluded,
        summary,
    }
}

fn exclusion_reason(report: &StockReport) -> String {
    match report.price_series().absence() {
        Some(absence) => format!("price series unavailable: {}", absence.message),
        None => String::from("fewer than two bars or a zero starting close"),
    }
}
