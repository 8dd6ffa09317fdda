use thiserror::Error;

use stockbrief_core::CoreError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] stockbrief_core::ValidationError),

    #[error(transparent)]
    Report(#[from] stockbrief_core::ReportError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Report(error) => Self::Report(error),
            CoreError::Serialization(error) => Self::Serialization(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Report(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbrief_core::ReportError;

    #[test]
    fn exit_codes_by_category() {
        let invalid = CliError::from(ReportError::invalid_option("interval", "7m"));
        assert_eq!(invalid.exit_code(), 2);

        let strict = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };
        assert_eq!(strict.exit_code(), 5);

        let io = CliError::from(std::io::Error::other("closed pipe"));
        assert_eq!(io.exit_code(), 10);
    }
}
