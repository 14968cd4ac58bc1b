//! Fiscal period types and the explicit transition table.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifies one fiscal period as (year, month).
///
/// Renders as the zero-padded `YYYY-MM` period code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeriodCode {
    year: i32,
    month: u32,
}

impl PeriodCode {
    /// Creates a period code; `None` for month outside 1..=12.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The period that owns the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1..=12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Status of a fiscal period.
///
/// `Open → MonthClosed → TaxFiled`, with the single backward edge
/// `MonthClosed → Open`. `TaxFiled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Period accepts postings.
    Open,
    /// Month closed by an operator; postings rejected, still reopenable.
    MonthClosed,
    /// Tax filed for the month; terminal, immutable.
    TaxFiled,
}

impl PeriodStatus {
    /// Returns true if ordinary callers may post into this period.
    #[must_use]
    pub const fn accepts_postings(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true once the month has been administratively closed
    /// (`MonthClosed` or `TaxFiled`) - the readiness condition for
    /// fiscal-year closing.
    #[must_use]
    pub const fn is_month_closed(self) -> bool {
        matches!(self, Self::MonthClosed | Self::TaxFiled)
    }

    /// The transition table: the next status for an operation, or `None`
    /// when the operation is not permitted from this status.
    ///
    /// Every legal and illegal edge of the state machine is enumerated
    /// here; the manager's operations consult nothing else.
    #[must_use]
    pub const fn apply(self, transition: PeriodTransition) -> Option<Self> {
        match (self, transition) {
            (Self::Open, PeriodTransition::CloseMonth) => Some(Self::MonthClosed),
            (Self::MonthClosed, PeriodTransition::FileTax) => Some(Self::TaxFiled),
            (Self::MonthClosed, PeriodTransition::Reopen) => Some(Self::Open),
            _ => None,
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::MonthClosed => "month_closed",
            Self::TaxFiled => "tax_filed",
        };
        write!(f, "{s}")
    }
}

/// Operations that move a period through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodTransition {
    /// Administrative month close. Not a balance or completeness check.
    CloseMonth,
    /// Mark the month's tax as filed.
    FileTax,
    /// Reopen a closed (not yet filed) month.
    Reopen,
}

impl std::fmt::Display for PeriodTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CloseMonth => "close_month",
            Self::FileTax => "file_tax",
            Self::Reopen => "reopen",
        };
        write!(f, "{s}")
    }
}

/// A fiscal period and its current status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// The (year, month) key.
    pub code: PeriodCode,
    /// Current lifecycle status.
    pub status: PeriodStatus,
}
