use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// One fiscal period of an income statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub period_end: Option<UtcDateTime>,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
}

/// One fiscal period of a balance sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub period_end: Option<UtcDateTime>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub stockholder_equity: Option<f64>,
    pub cash: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
}

/// One fiscal period of a cash flow statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub period_end: Option<UtcDateTime>,
    pub operating_cash_flow: Option<f64>,
    /// Negative when cash was spent.
    pub capital_expenditures: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub dividends_paid: Option<f64>,
}

impl CashFlowStatement {
    /// Fills `free_cash_flow` from operating cash flow and capex when the
    /// provider does not report it.
    pub fn with_derived_free_cash_flow(mut self) -> Self {
        if self.free_cash_flow.is_none() {
            self.free_cash_flow = self
                .operating_cash_flow
                .zip(self.capital_expenditures)
                .map(|(operating, capex)| operating + capex);
        }
        self
    }
}

/// Annual statements, most recent period first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income_statements: Vec<IncomeStatement>,
    pub balance_sheets: Vec<BalanceSheet>,
    pub cash_flows: Vec<CashFlowStatement>,
}

impl FinancialStatements {
    pub fn is_empty(&self) -> bool {
        self.income_statements.is_empty()
            && self.balance_sheets.is_empty()
            && self.cash_flows.is_empty()
    }

    pub fn latest_income_statement(&self) -> Option<&IncomeStatement> {
        self.income_statements.first()
    }
}

/// Upcoming earnings and dividend dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvents {
    /// One date, or a window of two when the company has not confirmed.
    pub earnings_dates: Vec<UtcDateTime>,
    pub earnings_average: Option<f64>,
    pub earnings_low: Option<f64>,
    pub earnings_high: Option<f64>,
    pub revenue_average: Option<f64>,
    pub ex_dividend_date: Option<UtcDateTime>,
    pub dividend_date: Option<UtcDateTime>,
}

impl CalendarEvents {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn next_earnings_date(&self) -> Option<UtcDateTime> {
        self.earnings_dates.first().copied()
    }
}

/// Cash dividend paid per share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: UtcDateTime,
    pub amount: f64,
}

impl Dividend {
    pub fn new(date: UtcDateTime, amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "amount" });
        }
        if amount < 0.0 {
            return Err(ValidationError::NegativeValue { field: "amount" });
        }
        Ok(Self { date, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_cash_flow_is_derived_only_when_missing() {
        let derived = CashFlowStatement {
            operating_cash_flow: Some(110.0),
            capital_expenditures: Some(-10.0),
            ..CashFlowStatement::default()
        }
        .with_derived_free_cash_flow();
        assert_eq!(derived.free_cash_flow, Some(100.0));

        let reported = CashFlowStatement {
            operating_cash_flow: Some(110.0),
            capital_expenditures: Some(-10.0),
            free_cash_flow: Some(95.0),
            ..CashFlowStatement::default()
        }
        .with_derived_free_cash_flow();
        assert_eq!(reported.free_cash_flow, Some(95.0));

        let partial = CashFlowStatement {
            operating_cash_flow: Some(110.0),
            ..CashFlowStatement::default()
        }
        .with_derived_free_cash_flow();
        assert_eq!(partial.free_cash_flow, None);
    }

    #[test]
    fn dividends_reject_negative_and_non_finite_amounts() {
        let date = UtcDateTime::from_unix_timestamp(1_704_067_200).expect("timestamp");
        assert!(Dividend::new(date, 0.24).is_ok());
        assert!(matches!(
            Dividend::new(date, -0.1),
            Err(ValidationError::NegativeValue { field: "amount" })
        ));
        assert!(matches!(
            Dividend::new(date, f64::INFINITY),
            Err(ValidationError::NonFiniteValue { field: "amount" })
        ));
    }

    #[test]
    fn empty_statements_and_calendar() {
        assert!(FinancialStatements::default().is_empty());
        assert!(CalendarEvents::default().is_empty());
        assert_eq!(CalendarEvents::default().next_earnings_date(), None);
    }
}
