//! Fiscal-year closing types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use balans_shared::types::{JournalEntryId, Money};

use crate::ledger::JournalLine;

/// Status of a fiscal year's closing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingStatus {
    /// The year has not been closed.
    NotClosed,
    /// The year has been closed. Never reopened by this core; undoing a
    /// closing is a manual reversal plus period reopen, not a transition.
    Closed,
}

/// One closing record per fiscal year.
#[derive(Debug, Clone, Serialize)]
pub struct FiscalYearClosing {
    /// The fiscal year.
    pub year: i32,
    /// Closing status.
    pub status: ClosingStatus,
    /// When the year was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// The closing entry produced, absent for a year with no nominal
    /// activity.
    pub closing_entry: Option<JournalEntryId>,
}

impl FiscalYearClosing {
    /// The lazily-created default record for a year that was never closed.
    #[must_use]
    pub const fn not_closed(year: i32) -> Self {
        Self {
            year,
            status: ClosingStatus::NotClosed,
            closed_at: None,
            closing_entry: None,
        }
    }
}

/// What `close_year` would do, without persisting anything.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingPreview {
    /// The fiscal year.
    pub year: i32,
    /// Computed accrual net income for the year, in minor units.
    pub net_income: Money,
    /// Date the closing entry would carry (last day of the year).
    pub closing_date: NaiveDate,
    /// Lines of the entry that would be posted; empty when the year has no
    /// nominal activity.
    pub lines: Vec<JournalLine>,
}
