use thiserror::Error;

/// Validation and contract errors exposed by `stockbrief-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid interval '{value}', expected one of 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo")]
    InvalidInterval { value: String },
    #[error("invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max")]
    InvalidPeriod { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("invalid unix timestamp {value}")]
    InvalidUnixTimestamp { value: i64 },
    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date range start {start} must be before end {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source cannot be empty")]
    EmptySource,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Request-level failures of the report builder.
///
/// Only caller mistakes surface here. Provider failures never fail a report;
/// they are recorded per field as [`crate::Absence`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("invalid option '{option}': {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error(transparent)]
    InvalidSymbol(#[from] ValidationError),
}

impl ReportError {
    pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidOption { .. } => "report.invalid_option",
            Self::InvalidSymbol(_) => "report.invalid_symbol",
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
