//! Pure line-level validation for journal entries.
//!
//! Account and period checks need shared state and live in the engine;
//! everything here is a function of the lines alone.

use balans_shared::types::Money;

use super::error::PostingError;
use super::types::{EntryTotals, JournalLine};

/// Validates line shape and balance, returning the exact totals.
///
/// Checks, in order: at least two lines; no negative amounts; exactly one
/// nonzero side per line; checked minor-unit sums; debits equal credits.
///
/// # Errors
///
/// The first violated rule, as a `PostingError`.
pub fn validate_lines(lines: &[JournalLine]) -> Result<EntryTotals, PostingError> {
    if lines.len() < 2 {
        return Err(PostingError::InsufficientLines);
    }

    let mut debit = Money::ZERO;
    let mut credit = Money::ZERO;

    for (index, line) in lines.iter().enumerate() {
        if line.debit.is_negative() || line.credit.is_negative() {
            return Err(PostingError::NegativeAmount { index });
        }
        let has_debit = line.debit.is_positive();
        let has_credit = line.credit.is_positive();
        if has_debit == has_credit {
            // Both sides set, or both zero.
            return Err(PostingError::MalformedLine { index });
        }

        debit = debit
            .checked_add(line.debit)
            .ok_or(PostingError::AmountOverflow)?;
        credit = credit
            .checked_add(line.credit)
            .ok_or(PostingError::AmountOverflow)?;
    }

    let totals = EntryTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(PostingError::ImbalancedEntry { debit, credit });
    }

    Ok(totals)
}
