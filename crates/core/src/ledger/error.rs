//! Posting engine error types.

use thiserror::Error;

use balans_shared::types::{JournalEntryId, Money};

use crate::account::AccountCode;
use crate::period::{PeriodCode, PeriodStatus};

/// Errors that can occur while posting or reversing journal entries.
#[derive(Debug, Error)]
pub enum PostingError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines")]
    InsufficientLines,

    /// A line must carry exactly one of debit/credit.
    #[error("Line {index} must have exactly one of debit or credit nonzero")]
    MalformedLine {
        /// Zero-based index of the offending line.
        index: usize,
    },

    /// Amounts cannot be negative.
    #[error("Line {index} has a negative amount")]
    NegativeAmount {
        /// Zero-based index of the offending line.
        index: usize,
    },

    /// Line totals overflow the minor-unit range.
    #[error("Entry totals overflow the minor-unit range")]
    AmountOverflow,

    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    ImbalancedEntry {
        /// Total debit amount in minor units.
        debit: Money,
        /// Total credit amount in minor units.
        credit: Money,
    },

    // ========== Account Errors ==========
    /// Account unknown or inactive.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountCode),

    /// Header accounts exist only for grouping and never receive postings.
    #[error("Account {0} is a header account and cannot receive postings")]
    HeaderAccountPosting(AccountCode),

    // ========== Period Errors ==========
    /// No fiscal period has been opened for the transaction date.
    #[error("No fiscal period exists for {0}")]
    PeriodNotFound(PeriodCode),

    /// The owning period does not accept postings.
    #[error("Fiscal period {period} is {status}, no posting allowed")]
    ClosedPeriod {
        /// The owning period.
        period: PeriodCode,
        /// Its current status.
        status: PeriodStatus,
    },

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry was already voided by a reversal.
    #[error("Journal entry {0} is already void")]
    AlreadyVoid(JournalEntryId),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::HeaderAccountPosting(_) => "HEADER_ACCOUNT_POSTING",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::ClosedPeriod { .. } => "CLOSED_PERIOD",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyVoid(_) => "ALREADY_VOID",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::MalformedLine { .. }
            | Self::NegativeAmount { .. }
            | Self::AmountOverflow
            | Self::ImbalancedEntry { .. }
            | Self::HeaderAccountPosting(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::PeriodNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::ClosedPeriod { .. } | Self::AlreadyVoid(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PostingError::InsufficientLines.error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            PostingError::ImbalancedEntry {
                debit: Money::from_minor(100_000),
                credit: Money::from_minor(90_000),
            }
            .error_code(),
            "IMBALANCED_ENTRY"
        );
        assert_eq!(
            PostingError::HeaderAccountPosting(AccountCode::new("1000")).error_code(),
            "HEADER_ACCOUNT_POSTING"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(PostingError::InsufficientLines.http_status_code(), 400);
        assert_eq!(
            PostingError::AccountNotFound(AccountCode::new("9999")).http_status_code(),
            404
        );
        let period = PeriodCode::new(2099, 1).unwrap();
        assert_eq!(
            PostingError::PeriodNotFound(period).http_status_code(),
            404
        );
        assert_eq!(
            PostingError::ClosedPeriod {
                period,
                status: PeriodStatus::MonthClosed,
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_imbalanced_display() {
        let err = PostingError::ImbalancedEntry {
            debit: Money::from_minor(100_000),
            credit: Money::from_minor(90_000),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 100000, Credit: 90000"
        );
    }
}
