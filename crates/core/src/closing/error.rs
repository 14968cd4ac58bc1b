//! Fiscal-year closing error types.

use thiserror::Error;

use crate::account::AccountCode;
use crate::ledger::PostingError;

/// Errors that can occur while previewing or executing a year closing.
#[derive(Debug, Error)]
pub enum ClosingError {
    /// The year is already closed.
    #[error("Fiscal year {0} is already closed")]
    AlreadyClosed(i32),

    /// Not all twelve periods are month-closed or tax-filed.
    #[error(
        "Fiscal year {year} is not ready to close: {} period(s) missing, {} still open",
        .missing.len(),
        .open.len()
    )]
    PeriodsNotReady {
        /// The fiscal year.
        year: i32,
        /// Months with no period opened.
        missing: Vec<u32>,
        /// Months whose period is still open.
        open: Vec<u32>,
    },

    /// The designated retained-earnings account is unusable.
    #[error("Invalid retained-earnings account {code}: {reason}")]
    InvalidRetainedEarnings {
        /// The configured account code.
        code: AccountCode,
        /// Why it was rejected.
        reason: String,
    },

    /// Year outside the supported calendar range.
    #[error("Invalid fiscal year: {0}")]
    InvalidYear(i32),

    /// The closing entry failed to post.
    #[error(transparent)]
    Posting(#[from] PostingError),
}

impl ClosingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyClosed(_) => "ALREADY_CLOSED",
            Self::PeriodsNotReady { .. } => "PERIODS_NOT_READY",
            Self::InvalidRetainedEarnings { .. } => "INVALID_RETAINED_EARNINGS",
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::Posting(inner) => inner.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AlreadyClosed(_) | Self::PeriodsNotReady { .. } => 409,
            Self::InvalidRetainedEarnings { .. } | Self::InvalidYear(_) => 400,
            Self::Posting(inner) => inner.http_status_code(),
        }
    }
}
