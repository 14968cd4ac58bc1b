//! Cash-flow report types.

use chrono::NaiveDate;
use serde::Serialize;

use balans_shared::types::Money;

use crate::account::AccountType;

/// Indirect-method activity classification of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityClass {
    /// Revenue/expense-driven cash movements.
    Operating,
    /// Asset acquisition and disposal.
    Investing,
    /// Liability and equity movements.
    Financing,
}

impl ActivityClass {
    /// The static mapping from counterparty account type to activity class.
    #[must_use]
    pub const fn from_account_type(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Revenue | AccountType::Expense => Self::Operating,
            AccountType::Asset => Self::Investing,
            AccountType::Liability | AccountType::Equity => Self::Financing,
        }
    }
}

/// Cash-flow report for a date range.
///
/// A value object, recomputed per call and never persisted. The identity
/// `beginning + operating + investing + financing = ending` holds exactly
/// in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowReport {
    /// Range start (inclusive).
    pub start_date: NaiveDate,
    /// Range end (inclusive).
    pub end_date: NaiveDate,
    /// Net cash balance from all posted entries dated before the range.
    pub beginning_balance: Money,
    /// Cash movement classified as operating activity.
    pub operating: Money,
    /// Cash movement classified as investing activity.
    pub investing: Money,
    /// Cash movement classified as financing activity.
    pub financing: Money,
    /// Ending minus beginning balance.
    pub net_change: Money,
    /// Cash balance at the end of the range.
    pub ending_balance: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_activity_mapping() {
        assert_eq!(
            ActivityClass::from_account_type(AccountType::Revenue),
            ActivityClass::Operating
        );
        assert_eq!(
            ActivityClass::from_account_type(AccountType::Expense),
            ActivityClass::Operating
        );
        assert_eq!(
            ActivityClass::from_account_type(AccountType::Asset),
            ActivityClass::Investing
        );
        assert_eq!(
            ActivityClass::from_account_type(AccountType::Liability),
            ActivityClass::Financing
        );
        assert_eq!(
            ActivityClass::from_account_type(AccountType::Equity),
            ActivityClass::Financing
        );
    }
}
