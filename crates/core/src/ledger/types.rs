//! Journal entry types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use balans_shared::types::{JournalEntryId, Money};

use crate::account::AccountCode;
use crate::period::PeriodCode;

/// Status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Posted to the ledger (immutable).
    Posted,
    /// Invalidated by a reversing entry. Never used for silent deletion.
    Void,
}

/// One line of a journal entry.
///
/// Exactly one of `debit`/`credit` is nonzero; both are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// The posted account.
    pub account: AccountCode,
    /// Debit amount in minor units (zero if the line credits).
    pub debit: Money,
    /// Credit amount in minor units (zero if the line debits).
    pub credit: Money,
}

impl JournalLine {
    /// A debit line.
    #[must_use]
    pub fn debit(account: AccountCode, amount: Money) -> Self {
        Self {
            account,
            debit: amount,
            credit: Money::ZERO,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account: AccountCode, amount: Money) -> Self {
        Self {
            account,
            debit: Money::ZERO,
            credit: amount,
        }
    }

    /// The mirrored line: debit becomes credit and vice versa.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            account: self.account.clone(),
            debit: self.credit,
            credit: self.debit,
        }
    }
}

/// A posted journal entry.
///
/// Immutable once returned by the engine; the only permitted state change
/// is `Posted -> Void` when a reversing entry invalidates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry identifier.
    pub id: JournalEntryId,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Owning fiscal period, derived from the date, never caller-supplied.
    pub period: PeriodCode,
    /// Monotonically increasing sequence within the owning period.
    pub sequence: u32,
    /// Free-text description.
    pub description: String,
    /// Optional external reference number.
    pub reference_number: Option<String>,
    /// Entry status.
    pub status: EntryStatus,
    /// Who posted the entry.
    pub posted_by: String,
    /// When the entry was persisted.
    pub created_at: DateTime<Utc>,
    /// Ordered lines; at least two, debits equal credits.
    pub lines: Vec<JournalLine>,
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// Transaction date; the owning period is derived from it.
    pub transaction_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional external reference number.
    pub reference_number: Option<String>,
    /// The entry lines.
    pub lines: Vec<JournalLine>,
    /// Who is posting.
    pub posted_by: String,
}

/// Entry totals used for balance validation and display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub debit: Money,
    /// Sum of credit amounts.
    pub credit: Money,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from exact minor-unit sums.
    #[must_use]
    pub fn new(debit: Money, credit: Money) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}
