//! Indirect-method cash-flow report.
//!
//! Read-only aggregation over posted entries; runs concurrently with
//! postings and sees a consistent snapshot because entries are persisted
//! atomically.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use balans_shared::types::Money;

use crate::account::{AccountCode, AccountRegistry, AccountSubtype};
use crate::ledger::{JournalEntry, PostingEngine};

use super::error::ReportError;
use super::types::{ActivityClass, CashFlowReport};

/// Generates cash-flow reports for arbitrary date ranges.
pub struct CashFlowService {
    registry: Arc<AccountRegistry>,
    engine: Arc<PostingEngine>,
}

impl CashFlowService {
    /// Creates a report service over the given registry and engine.
    #[must_use]
    pub fn new(registry: Arc<AccountRegistry>, engine: Arc<PostingEngine>) -> Self {
        Self { registry, engine }
    }

    /// Generates the report for `[start_date, end_date]`.
    ///
    /// Beginning balance is the net cash position from all posted entries
    /// strictly before the range. Each in-range entry that touches a
    /// cash-classified account has its non-cash lines classified into
    /// operating/investing/financing by the counterparty account's type;
    /// because every entry balances, the class sums partition the entry's
    /// cash delta exactly, so `beginning + operating + investing +
    /// financing = ending` always holds.
    ///
    /// # Errors
    ///
    /// `InvalidRange` if `start_date > end_date`.
    pub fn generate(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<CashFlowReport, ReportError> {
        if start_date > end_date {
            return Err(ReportError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let cash_accounts = self.cash_accounts();

        let beginning_balance = self
            .engine
            .posted_before(start_date)
            .iter()
            .map(|entry| cash_delta(entry, &cash_accounts))
            .sum();

        let mut operating = Money::ZERO;
        let mut investing = Money::ZERO;
        let mut financing = Money::ZERO;

        for entry in self.engine.posted_in_range(start_date, end_date) {
            let touches_cash = entry
                .lines
                .iter()
                .any(|line| cash_accounts.contains(&line.account));
            if !touches_cash {
                continue;
            }

            for line in &entry.lines {
                if cash_accounts.contains(&line.account) {
                    continue;
                }
                let Ok(account) = self.registry.lookup_any(&line.account) else {
                    continue;
                };
                // The non-cash line's credit-minus-debit is exactly its
                // share of the entry's cash movement.
                let contribution = line.credit - line.debit;
                match ActivityClass::from_account_type(account.account_type) {
                    ActivityClass::Operating => operating = operating + contribution,
                    ActivityClass::Investing => investing = investing + contribution,
                    ActivityClass::Financing => financing = financing + contribution,
                }
            }
        }

        let ending_balance = beginning_balance + operating + investing + financing;
        Ok(CashFlowReport {
            start_date,
            end_date,
            beginning_balance,
            operating,
            investing,
            financing,
            net_change: ending_balance - beginning_balance,
            ending_balance,
        })
    }

    /// The cash-classified account set (subtype `Cash` or `Bank`),
    /// including deactivated accounts so historical entries keep their
    /// classification.
    fn cash_accounts(&self) -> HashSet<AccountCode> {
        self.registry
            .list(true)
            .into_iter()
            .filter(|a| a.subtype.is_some_and(AccountSubtype::is_cash))
            .map(|a| a.code)
            .collect()
    }
}

fn cash_delta(entry: &JournalEntry, cash_accounts: &HashSet<AccountCode>) -> Money {
    entry
        .lines
        .iter()
        .filter(|line| cash_accounts.contains(&line.account))
        .map(|line| line.debit - line.credit)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{
        AccountSubtype, AccountType, CreateAccountInput, NormalBalance,
    };
    use crate::events::{EventSink, MemorySink};
    use crate::ledger::{JournalLine, PostEntryInput};
    use crate::period::PeriodManager;
    use proptest::prelude::*;

    struct Fixture {
        registry: Arc<AccountRegistry>,
        periods: Arc<PeriodManager>,
        engine: Arc<PostingEngine>,
        reports: CashFlowService,
    }

    fn fixture() -> Fixture {
        let events: Arc<dyn EventSink> = Arc::new(MemorySink::new());
        let registry = Arc::new(AccountRegistry::new(events.clone()));
        let periods = Arc::new(PeriodManager::new(events.clone()));
        let engine = Arc::new(PostingEngine::new(
            registry.clone(),
            periods.clone(),
            events,
        ));
        let reports = CashFlowService::new(registry.clone(), engine.clone());
        Fixture {
            registry,
            periods,
            engine,
            reports,
        }
    }

    fn add_account(
        f: &Fixture,
        code: &str,
        account_type: AccountType,
        subtype: Option<AccountSubtype>,
    ) {
        f.registry
            .create(
                CreateAccountInput {
                    code: AccountCode::new(code),
                    name: format!("Account {code}"),
                    account_type,
                    normal_balance: match account_type {
                        AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
                        _ => NormalBalance::Credit,
                    },
                    is_header: false,
                    parent: None,
                    subtype,
                },
                "tester",
            )
            .unwrap();
    }

    fn chart(f: &Fixture) {
        add_account(f, "1000", AccountType::Asset, Some(AccountSubtype::Cash));
        add_account(f, "1500", AccountType::Asset, Some(AccountSubtype::FixedAsset));
        add_account(f, "2000", AccountType::Liability, Some(AccountSubtype::ShortTermDebt));
        add_account(f, "4000", AccountType::Revenue, Some(AccountSubtype::OperatingRevenue));
        add_account(f, "5000", AccountType::Expense, Some(AccountSubtype::OperatingExpense));
    }

    fn post(f: &Fixture, date: NaiveDate, lines: Vec<JournalLine>) {
        f.engine
            .post(PostEntryInput {
                transaction_date: date,
                description: "test".to_string(),
                reference_number: None,
                lines,
                posted_by: "tester".to_string(),
            })
            .unwrap();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn minor(v: i64) -> Money {
        Money::from_minor(v)
    }

    #[test]
    fn test_inverted_range_rejected() {
        let f = fixture();
        let result = f.reports.generate(date(2099, 2, 1), date(2099, 1, 1));
        assert!(matches!(result, Err(ReportError::InvalidRange { .. })));
    }

    #[test]
    fn test_empty_range_is_all_zero() {
        let f = fixture();
        chart(&f);
        let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
        assert_eq!(report.beginning_balance, Money::ZERO);
        assert_eq!(report.operating, Money::ZERO);
        assert_eq!(report.investing, Money::ZERO);
        assert_eq!(report.financing, Money::ZERO);
        assert_eq!(report.net_change, Money::ZERO);
        assert_eq!(report.ending_balance, report.beginning_balance);
    }

    #[test]
    fn test_classification_by_counterparty_type() {
        let f = fixture();
        chart(&f);
        f.periods.open(2099, 1, "ops").unwrap();

        // Cash sale: operating +100000.
        post(
            &f,
            date(2099, 1, 5),
            vec![
                JournalLine::debit(AccountCode::new("1000"), minor(100_000)),
                JournalLine::credit(AccountCode::new("4000"), minor(100_000)),
            ],
        );
        // Equipment purchase with cash: investing -40000.
        post(
            &f,
            date(2099, 1, 10),
            vec![
                JournalLine::debit(AccountCode::new("1500"), minor(40_000)),
                JournalLine::credit(AccountCode::new("1000"), minor(40_000)),
            ],
        );
        // Loan received in cash: financing +30000.
        post(
            &f,
            date(2099, 1, 15),
            vec![
                JournalLine::debit(AccountCode::new("1000"), minor(30_000)),
                JournalLine::credit(AccountCode::new("2000"), minor(30_000)),
            ],
        );
        // Rent paid in cash: operating -25000.
        post(
            &f,
            date(2099, 1, 20),
            vec![
                JournalLine::debit(AccountCode::new("5000"), minor(25_000)),
                JournalLine::credit(AccountCode::new("1000"), minor(25_000)),
            ],
        );

        let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
        assert_eq!(report.beginning_balance, Money::ZERO);
        assert_eq!(report.operating, minor(75_000));
        assert_eq!(report.investing, minor(-40_000));
        assert_eq!(report.financing, minor(30_000));
        assert_eq!(report.net_change, minor(65_000));
        assert_eq!(report.ending_balance, minor(65_000));
    }

    #[test]
    fn test_beginning_balance_from_prior_entries() {
        let f = fixture();
        chart(&f);
        f.periods.open(2098, 12, "ops").unwrap();
        f.periods.open(2099, 1, "ops").unwrap();

        post(
            &f,
            date(2098, 12, 20),
            vec![
                JournalLine::debit(AccountCode::new("1000"), minor(500_000)),
                JournalLine::credit(AccountCode::new("4000"), minor(500_000)),
            ],
        );
        post(
            &f,
            date(2099, 1, 10),
            vec![
                JournalLine::debit(AccountCode::new("5000"), minor(100_000)),
                JournalLine::credit(AccountCode::new("1000"), minor(100_000)),
            ],
        );

        let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
        assert_eq!(report.beginning_balance, minor(500_000));
        assert_eq!(report.operating, minor(-100_000));
        assert_eq!(report.ending_balance, minor(400_000));
    }

    #[test]
    fn test_non_cash_entries_ignored() {
        let f = fixture();
        chart(&f);
        f.periods.open(2099, 1, "ops").unwrap();

        // Credit purchase of equipment: no cash line, no report impact.
        post(
            &f,
            date(2099, 1, 12),
            vec![
                JournalLine::debit(AccountCode::new("1500"), minor(90_000)),
                JournalLine::credit(AccountCode::new("2000"), minor(90_000)),
            ],
        );

        let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
        assert_eq!(report.net_change, Money::ZERO);
        assert_eq!(report.operating, Money::ZERO);
        assert_eq!(report.investing, Money::ZERO);
        assert_eq!(report.financing, Money::ZERO);
    }

    #[test]
    fn test_cash_to_cash_transfer_moves_nothing() {
        let f = fixture();
        chart(&f);
        add_account(&f, "1010", AccountType::Asset, Some(AccountSubtype::Bank));
        f.periods.open(2099, 1, "ops").unwrap();

        post(
            &f,
            date(2099, 1, 8),
            vec![
                JournalLine::debit(AccountCode::new("1010"), minor(70_000)),
                JournalLine::credit(AccountCode::new("1000"), minor(70_000)),
            ],
        );

        let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
        // Total cash is unchanged and nothing is classified.
        assert_eq!(report.net_change, Money::ZERO);
        assert_eq!(report.operating, Money::ZERO);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        /// beginning + operating + investing + financing = ending, for any
        /// mix of cash sales, purchases, and borrowings across the window
        /// boundary.
        #[test]
        fn prop_report_identity(
            amounts in prop::collection::vec((1i64..100_000, 0usize..4, 1u32..28), 1..25),
        ) {
            let f = fixture();
            chart(&f);
            f.periods.open(2098, 12, "ops").unwrap();
            f.periods.open(2099, 1, "ops").unwrap();

            for (amount, kind, day) in amounts {
                let (month_year, month) = if day % 2 == 0 { (2098, 12) } else { (2099, 1) };
                let counterparty = match kind {
                    0 => "4000",
                    1 => "5000",
                    2 => "1500",
                    _ => "2000",
                };
                let cash_in = matches!(kind, 0 | 3);
                let lines = if cash_in {
                    vec![
                        JournalLine::debit(AccountCode::new("1000"), minor(amount)),
                        JournalLine::credit(AccountCode::new(counterparty), minor(amount)),
                    ]
                } else {
                    vec![
                        JournalLine::debit(AccountCode::new(counterparty), minor(amount)),
                        JournalLine::credit(AccountCode::new("1000"), minor(amount)),
                    ]
                };
                post(&f, date(month_year, month, day), lines);
            }

            let report = f.reports.generate(date(2099, 1, 1), date(2099, 1, 31)).unwrap();
            prop_assert_eq!(
                report.ending_balance,
                report.beginning_balance
                    + report.operating
                    + report.investing
                    + report.financing
            );
            prop_assert_eq!(report.net_change, report.ending_balance - report.beginning_balance);
        }
    }
}
