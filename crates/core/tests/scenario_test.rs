//! End-to-end scenarios through the wired ledger core.

use std::sync::Arc;

use chrono::NaiveDate;

use balans_core::account::{
    AccountCode, AccountSubtype, AccountType, CreateAccountInput, NormalBalance,
};
use balans_core::closing::ClosingError;
use balans_core::events::MemorySink;
use balans_core::ledger::{JournalLine, PostEntryInput, PostingError};
use balans_core::period::{PeriodError, PeriodStatus};
use balans_core::Ledger;
use balans_shared::types::Money;

fn ledger() -> Ledger {
    Ledger::new(Arc::new(MemorySink::new()))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_account(ledger: &Ledger, code: &str, account_type: AccountType) {
    let subtype = match (code, account_type) {
        ("1000", _) => Some(AccountSubtype::Cash),
        (_, AccountType::Equity) => Some(AccountSubtype::RetainedEarnings),
        _ => None,
    };
    ledger
        .accounts()
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

fn sale(ledger: &Ledger, day: NaiveDate, debit: i64, credit: i64) -> Result<(), PostingError> {
    ledger
        .journal()
        .post(PostEntryInput {
            transaction_date: day,
            description: "Cash sale".to_string(),
            reference_number: None,
            lines: vec![
                JournalLine::debit(AccountCode::new("1000"), Money::from_minor(debit)),
                JournalLine::credit(AccountCode::new("4000"), Money::from_minor(credit)),
            ],
            posted_by: "tester".to_string(),
        })
        .map(|_| ())
}

// Create 1000 (asset) and 4000 (revenue); a balanced 100000 post into an
// open period succeeds, the same post with credit 90000 is rejected as
// imbalanced.
#[test]
fn posting_scenario() {
    let ledger = ledger();
    add_account(&ledger, "1000", AccountType::Asset);
    add_account(&ledger, "4000", AccountType::Revenue);
    ledger.periods().open(2099, 1, "ops").unwrap();

    sale(&ledger, date(2099, 1, 15), 100_000, 100_000).unwrap();

    let result = sale(&ledger, date(2099, 1, 16), 100_000, 90_000);
    assert!(matches!(
        result,
        Err(PostingError::ImbalancedEntry { .. })
    ));

    // The failed post left no partial entry behind.
    assert_eq!(ledger.journal().posted_in_year(2099).len(), 1);
}

// Period 2099-01: open -> month_closed -> tax_filed, then reopen fails.
#[test]
fn period_lifecycle_scenario() {
    let ledger = ledger();

    let opened = ledger.periods().open(2099, 1, "ops").unwrap();
    assert_eq!(opened.status, PeriodStatus::Open);

    let closed = ledger.periods().close_month(2099, 1, "ops").unwrap();
    assert_eq!(closed.status, PeriodStatus::MonthClosed);

    let filed = ledger.periods().file_tax(2099, 1, "ops").unwrap();
    assert_eq!(filed.status, PeriodStatus::TaxFiled);

    assert!(matches!(
        ledger.periods().reopen(2099, 1, "ops"),
        Err(PeriodError::InvalidTransition { .. })
    ));
}

// Closing 2097 with December open fails; once all twelve months are
// closed it succeeds exactly once, with net income in the closing entry.
#[test]
fn year_closing_scenario() {
    let ledger = ledger();
    add_account(&ledger, "1000", AccountType::Asset);
    add_account(&ledger, "3200", AccountType::Equity);
    add_account(&ledger, "4000", AccountType::Revenue);
    for month in 1..=12 {
        ledger.periods().open(2097, month, "ops").unwrap();
    }

    sale(&ledger, date(2097, 4, 2), 250_000, 250_000).unwrap();

    for month in 1..=11 {
        ledger.periods().close_month(2097, month, "ops").unwrap();
    }

    let retained_earnings = AccountCode::new("3200");
    let blocked = ledger.closing().close_year(2097, &retained_earnings, "ops");
    assert!(matches!(
        blocked,
        Err(ClosingError::PeriodsNotReady { .. })
    ));

    ledger.periods().close_month(2097, 12, "ops").unwrap();

    let record = ledger
        .closing()
        .close_year(2097, &retained_earnings, "ops")
        .unwrap();
    let entry = ledger.journal().entry(record.closing_entry.unwrap()).unwrap();

    let re_line = entry
        .lines
        .iter()
        .find(|l| l.account.as_str() == "3200")
        .unwrap();
    assert_eq!(re_line.credit, Money::from_minor(250_000));

    assert!(matches!(
        ledger.closing().close_year(2097, &retained_earnings, "ops"),
        Err(ClosingError::AlreadyClosed(2097))
    ));
}

// A posting that raced a month close is impossible: once the period
// reads month_closed, posting fails, and reopening admits it again.
#[test]
fn close_then_reopen_gates_postings() {
    let ledger = ledger();
    add_account(&ledger, "1000", AccountType::Asset);
    add_account(&ledger, "4000", AccountType::Revenue);
    ledger.periods().open(2099, 3, "ops").unwrap();
    ledger.periods().close_month(2099, 3, "ops").unwrap();

    assert!(matches!(
        sale(&ledger, date(2099, 3, 5), 100, 100),
        Err(PostingError::ClosedPeriod { .. })
    ));

    ledger.periods().reopen(2099, 3, "ops").unwrap();
    sale(&ledger, date(2099, 3, 5), 100, 100).unwrap();
}

// The report identity holds across a posting-heavy window.
#[test]
fn cash_flow_over_scenario_entries() {
    let ledger = ledger();
    add_account(&ledger, "1000", AccountType::Asset);
    add_account(&ledger, "4000", AccountType::Revenue);
    ledger.periods().open(2099, 1, "ops").unwrap();

    sale(&ledger, date(2099, 1, 3), 120_000, 120_000).unwrap();
    sale(&ledger, date(2099, 1, 22), 80_000, 80_000).unwrap();

    let report = ledger
        .reports()
        .generate(date(2099, 1, 1), date(2099, 1, 31))
        .unwrap();
    assert_eq!(report.operating, Money::from_minor(200_000));
    assert_eq!(
        report.ending_balance,
        report.beginning_balance + report.operating + report.investing + report.financing
    );
}
