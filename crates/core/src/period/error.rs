//! Fiscal period error types.

use thiserror::Error;

use super::types::{PeriodCode, PeriodStatus, PeriodTransition};

/// Errors that can occur during period management operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Period already exists.
    #[error("Fiscal period {0} already exists")]
    DuplicatePeriod(PeriodCode),

    /// Period does not exist.
    #[error("Fiscal period {year:04}-{month:02} not found")]
    PeriodNotFound {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// The operation is not permitted from the period's current status.
    #[error("Cannot {transition} period {code}: status is {status}")]
    InvalidTransition {
        /// The period.
        code: PeriodCode,
        /// Its current status.
        status: PeriodStatus,
        /// The rejected operation.
        transition: PeriodTransition,
    },
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePeriod(_) => "DUPLICATE_PERIOD",
            Self::PeriodNotFound { .. } => "PERIOD_NOT_FOUND",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicatePeriod(_) | Self::InvalidTransition { .. } => 409,
            Self::PeriodNotFound { .. } => 404,
            Self::InvalidMonth(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_status() {
        let code = PeriodCode::new(2099, 1).unwrap();
        assert_eq!(
            PeriodError::DuplicatePeriod(code).error_code(),
            "DUPLICATE_PERIOD"
        );
        assert_eq!(PeriodError::DuplicatePeriod(code).http_status_code(), 409);
        assert_eq!(
            PeriodError::PeriodNotFound { year: 2099, month: 1 }.http_status_code(),
            404
        );
        assert_eq!(PeriodError::InvalidMonth(13).http_status_code(), 400);
        assert_eq!(
            PeriodError::InvalidTransition {
                code,
                status: PeriodStatus::TaxFiled,
                transition: PeriodTransition::Reopen,
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = PeriodError::InvalidTransition {
            code: PeriodCode::new(2099, 1).unwrap(),
            status: PeriodStatus::TaxFiled,
            transition: PeriodTransition::Reopen,
        };
        assert_eq!(
            err.to_string(),
            "Cannot reopen period 2099-01: status is tax_filed"
        );
    }
}
