//! Fiscal-year closing process.
//!
//! Summarizes a year's nominal activity into one closing entry and marks
//! the year closed, exactly once. The closing record's `NotClosed -> Closed`
//! check doubles as the single-writer latch: the record table's write lock
//! is held for the whole execution, so two `close_year` calls for the same
//! year cannot both succeed.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use balans_shared::types::Money;

use crate::account::{AccountCode, AccountRegistry, AccountType};
use crate::events::{DomainEvent, EventSink};
use crate::ledger::engine::PostingGate;
use crate::ledger::{JournalLine, PostEntryInput, PostingEngine};
use crate::period::manager::PeriodTable;
use crate::period::{PeriodCode, PeriodManager};

use super::error::ClosingError;
use super::types::{ClosingPreview, ClosingStatus, FiscalYearClosing};

/// Net nominal balance of one account over a year.
///
/// Revenue balances are credit-minus-debit, expense balances are
/// debit-minus-credit, so a positive value is a balance on the account's
/// conventional side.
struct NominalBalance {
    account_type: AccountType,
    net: Money,
}

/// Computes and posts the single closing entry per year.
pub struct ClosingProcess {
    records: RwLock<HashMap<i32, FiscalYearClosing>>,
    periods: Arc<PeriodManager>,
    registry: Arc<AccountRegistry>,
    engine: Arc<PostingEngine>,
    events: Arc<dyn EventSink>,
}

impl ClosingProcess {
    /// Creates a closing process over the given collaborators.
    #[must_use]
    pub fn new(
        periods: Arc<PeriodManager>,
        registry: Arc<AccountRegistry>,
        engine: Arc<PostingEngine>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            periods,
            registry,
            engine,
            events,
        }
    }

    /// The closing record for a year; a lazily-created `NotClosed` record
    /// for years never closed.
    #[must_use]
    pub fn status(&self, year: i32) -> FiscalYearClosing {
        self.records
            .read()
            .get(&year)
            .cloned()
            .unwrap_or(FiscalYearClosing::not_closed(year))
    }

    /// Computes what `close_year` would post, persisting nothing.
    ///
    /// # Errors
    ///
    /// Same failure modes as `close_year`, minus posting failures.
    pub fn preview_year(
        &self,
        year: i32,
        retained_earnings: &AccountCode,
    ) -> Result<ClosingPreview, ClosingError> {
        if self.status(year).status == ClosingStatus::Closed {
            return Err(ClosingError::AlreadyClosed(year));
        }

        let closing_date = last_day_of_year(year)?;
        {
            let table = self.periods.read_table();
            check_periods_ready(&table, year)?;
        }
        self.validate_retained_earnings(retained_earnings)?;

        let (net_income, lines) = self.build_closing_lines(year, retained_earnings);
        Ok(ClosingPreview {
            year,
            net_income,
            closing_date,
            lines,
        })
    }

    /// Closes the year: computes net income, posts the closing entry
    /// through the engine's privileged path, and marks the year closed.
    ///
    /// The closing entry is the one permitted exception to the
    /// period-open rule because it originates here, not from a general
    /// caller; balance and account checks still apply in full.
    ///
    /// # Errors
    ///
    /// `AlreadyClosed`, `PeriodsNotReady`, `InvalidRetainedEarnings`, or a
    /// posting failure for the closing entry itself.
    pub fn close_year(
        &self,
        year: i32,
        retained_earnings: &AccountCode,
        actor: &str,
    ) -> Result<FiscalYearClosing, ClosingError> {
        let closing_date = last_day_of_year(year)?;

        // Held for the duration: the single-writer latch for this year.
        let mut records = self.records.write();
        if records.get(&year).is_some_and(|r| r.status == ClosingStatus::Closed) {
            return Err(ClosingError::AlreadyClosed(year));
        }

        self.validate_retained_earnings(retained_earnings)?;

        // The period table guard is held across the readiness check, the
        // net-income computation, and the posting of the closing entry, so
        // no period of the year can transition underneath the closing.
        let closing_entry = {
            let table = self.periods.read_table();
            check_periods_ready(&table, year)?;

            let (net_income, lines) = self.build_closing_lines(year, retained_earnings);
            if lines.is_empty() {
                tracing::info!(year, "closing year with no nominal activity, no entry posted");
                None
            } else {
                let input = PostEntryInput {
                    transaction_date: closing_date,
                    description: format!("Year-end closing {year}"),
                    reference_number: None,
                    lines,
                    posted_by: actor.to_string(),
                };
                let entry = self
                    .engine
                    .post_with_table(&table, input, PostingGate::AllowClosed)?;
                tracing::info!(
                    year,
                    entry_id = %entry.id,
                    net_income = %net_income,
                    "closing entry posted"
                );
                Some(entry)
            }
        };
        if let Some(entry) = &closing_entry {
            self.engine.announce(entry);
        }

        let record = FiscalYearClosing {
            year,
            status: ClosingStatus::Closed,
            closed_at: Some(Utc::now()),
            closing_entry: closing_entry.as_ref().map(|e| e.id),
        };
        records.insert(year, record.clone());
        drop(records);

        self.events.publish(DomainEvent::YearClosed {
            year,
            closing_entry: record.closing_entry,
            actor: actor.to_string(),
            at: Utc::now(),
        });

        Ok(record)
    }

    /// Net income and the zeroing lines for the year's nominal accounts.
    fn build_closing_lines(
        &self,
        year: i32,
        retained_earnings: &AccountCode,
    ) -> (Money, Vec<JournalLine>) {
        let mut balances: BTreeMap<AccountCode, NominalBalance> = BTreeMap::new();

        for entry in self.engine.posted_in_year(year) {
            for line in &entry.lines {
                let Ok(account) = self.registry.lookup_any(&line.account) else {
                    continue;
                };
                if !account.account_type.is_nominal() {
                    continue;
                }
                let delta = match account.account_type {
                    AccountType::Revenue => line.credit - line.debit,
                    _ => line.debit - line.credit,
                };
                balances
                    .entry(line.account.clone())
                    .and_modify(|b| b.net = b.net + delta)
                    .or_insert(NominalBalance {
                        account_type: account.account_type,
                        net: delta,
                    });
            }
        }

        let mut net_income = Money::ZERO;
        let mut lines = Vec::new();
        for (code, balance) in &balances {
            if balance.net.is_zero() {
                continue;
            }
            match balance.account_type {
                AccountType::Revenue => {
                    net_income = net_income + balance.net;
                    // Zero the account from the side opposite its balance.
                    if balance.net.is_positive() {
                        lines.push(JournalLine::debit(code.clone(), balance.net));
                    } else {
                        lines.push(JournalLine::credit(code.clone(), -balance.net));
                    }
                }
                AccountType::Expense => {
                    net_income = net_income - balance.net;
                    if balance.net.is_positive() {
                        lines.push(JournalLine::credit(code.clone(), balance.net));
                    } else {
                        lines.push(JournalLine::debit(code.clone(), -balance.net));
                    }
                }
                _ => {}
            }
        }

        if !net_income.is_zero() {
            let line = if net_income.is_positive() {
                JournalLine::credit(retained_earnings.clone(), net_income)
            } else {
                JournalLine::debit(retained_earnings.clone(), -net_income)
            };
            lines.push(line);
        }

        (net_income, lines)
    }

    fn validate_retained_earnings(&self, code: &AccountCode) -> Result<(), ClosingError> {
        let account =
            self.registry
                .lookup(code)
                .map_err(|_| ClosingError::InvalidRetainedEarnings {
                    code: code.clone(),
                    reason: "account not found or inactive".to_string(),
                })?;
        if account.is_header {
            return Err(ClosingError::InvalidRetainedEarnings {
                code: code.clone(),
                reason: "header accounts cannot receive postings".to_string(),
            });
        }
        if account.account_type != AccountType::Equity {
            return Err(ClosingError::InvalidRetainedEarnings {
                code: code.clone(),
                reason: format!("expected an equity account, found {}", account.account_type),
            });
        }
        Ok(())
    }
}

fn last_day_of_year(year: i32) -> Result<NaiveDate, ClosingError> {
    NaiveDate::from_ymd_opt(year, 12, 31).ok_or(ClosingError::InvalidYear(year))
}

fn check_periods_ready(table: &PeriodTable, year: i32) -> Result<(), ClosingError> {
    let mut missing = Vec::new();
    let mut open = Vec::new();

    for month in 1..=12 {
        let Some(code) = PeriodCode::new(year, month) else {
            continue;
        };
        match table.get(&code) {
            None => missing.push(month),
            Some(period) if !period.status.is_month_closed() => open.push(month),
            Some(_) => {}
        }
    }

    if missing.is_empty() && open.is_empty() {
        Ok(())
    } else {
        Err(ClosingError::PeriodsNotReady {
            year,
            missing,
            open,
        })
    }
}
