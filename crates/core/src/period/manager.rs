//! Fiscal period manager.
//!
//! Exclusive owner of period status. Transitions take the table's write
//! lock; the posting engine holds the read lock across its status check and
//! persist step, so a post that read `Open` and a concurrent `close_month`
//! can never both succeed for the same period.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::events::{DomainEvent, EventSink};

use super::error::PeriodError;
use super::types::{FiscalPeriod, PeriodCode, PeriodStatus, PeriodTransition};

/// Table of fiscal periods keyed by period code.
pub(crate) type PeriodTable = BTreeMap<PeriodCode, FiscalPeriod>;

/// Per-year-month state machine gating which dates accept postings.
pub struct PeriodManager {
    table: RwLock<PeriodTable>,
    events: Arc<dyn EventSink>,
}

impl PeriodManager {
    /// Creates an empty manager publishing to the given sink.
    #[must_use]
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            table: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    /// Opens a new period in status `Open`.
    ///
    /// Period creation is an explicit administrative step; the posting
    /// engine never creates periods implicitly.
    ///
    /// # Errors
    ///
    /// `InvalidMonth` for month outside 1..=12, `DuplicatePeriod` if the
    /// period already exists.
    pub fn open(&self, year: i32, month: u32, actor: &str) -> Result<FiscalPeriod, PeriodError> {
        let code = PeriodCode::new(year, month).ok_or(PeriodError::InvalidMonth(month))?;

        let mut table = self.table.write();
        if table.contains_key(&code) {
            return Err(PeriodError::DuplicatePeriod(code));
        }
        let period = FiscalPeriod {
            code,
            status: PeriodStatus::Open,
        };
        table.insert(code, period);
        drop(table);

        tracing::info!(period = %code, actor, "fiscal period opened");
        Ok(period)
    }

    /// Closes the month: `Open -> MonthClosed`.
    ///
    /// A deliberate administrative checkpoint; it does not verify that
    /// postings are complete or balanced.
    ///
    /// # Errors
    ///
    /// `PeriodNotFound` or `InvalidTransition`.
    pub fn close_month(
        &self,
        year: i32,
        month: u32,
        actor: &str,
    ) -> Result<FiscalPeriod, PeriodError> {
        self.transition(year, month, PeriodTransition::CloseMonth, actor)
    }

    /// Files tax for the month: `MonthClosed -> TaxFiled` (terminal).
    ///
    /// # Errors
    ///
    /// `PeriodNotFound` or `InvalidTransition`.
    pub fn file_tax(
        &self,
        year: i32,
        month: u32,
        actor: &str,
    ) -> Result<FiscalPeriod, PeriodError> {
        self.transition(year, month, PeriodTransition::FileTax, actor)
    }

    /// Reopens a closed month: `MonthClosed -> Open`.
    ///
    /// Filed periods are immutable; reopening one requires an out-of-band
    /// override this core does not provide.
    ///
    /// # Errors
    ///
    /// `PeriodNotFound` or `InvalidTransition`.
    pub fn reopen(&self, year: i32, month: u32, actor: &str) -> Result<FiscalPeriod, PeriodError> {
        self.transition(year, month, PeriodTransition::Reopen, actor)
    }

    fn transition(
        &self,
        year: i32,
        month: u32,
        transition: PeriodTransition,
        actor: &str,
    ) -> Result<FiscalPeriod, PeriodError> {
        let code =
            PeriodCode::new(year, month).ok_or(PeriodError::InvalidMonth(month))?;

        let mut table = self.table.write();
        let period = table
            .get_mut(&code)
            .ok_or(PeriodError::PeriodNotFound { year, month })?;

        let from = period.status;
        let to = from
            .apply(transition)
            .ok_or(PeriodError::InvalidTransition {
                code,
                status: from,
                transition,
            })?;
        period.status = to;
        let snapshot = *period;
        drop(table);

        tracing::info!(period = %code, %from, %to, actor, "fiscal period transition");
        self.events.publish(DomainEvent::PeriodTransitioned {
            period: code,
            from,
            to,
            actor: actor.to_string(),
            at: Utc::now(),
        });

        Ok(snapshot)
    }

    /// Current status of a period, if it exists.
    #[must_use]
    pub fn status(&self, year: i32, month: u32) -> Option<PeriodStatus> {
        let code = PeriodCode::new(year, month)?;
        self.table.read().get(&code).map(|p| p.status)
    }

    /// All periods of a year, in month order.
    #[must_use]
    pub fn list_year(&self, year: i32) -> Vec<FiscalPeriod> {
        self.table
            .read()
            .values()
            .filter(|p| p.code.year() == year)
            .copied()
            .collect()
    }

    /// Read guard over the period table.
    ///
    /// The posting engine and closing process hold this guard across their
    /// status checks and persist steps to serialize against transitions.
    pub(crate) fn read_table(&self) -> RwLockReadGuard<'_, PeriodTable> {
        self.table.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use rstest::rstest;

    fn manager() -> PeriodManager {
        PeriodManager::new(Arc::new(MemorySink::new()))
    }

    #[test]
    fn test_open_creates_open_period() {
        let mgr = manager();
        let period = mgr.open(2099, 1, "ops").unwrap();
        assert_eq!(period.status, PeriodStatus::Open);
        assert_eq!(mgr.status(2099, 1), Some(PeriodStatus::Open));
    }

    #[test]
    fn test_open_duplicate_fails() {
        let mgr = manager();
        mgr.open(2099, 1, "ops").unwrap();
        assert!(matches!(
            mgr.open(2099, 1, "ops"),
            Err(PeriodError::DuplicatePeriod(_))
        ));
    }

    #[test]
    fn test_open_invalid_month() {
        let mgr = manager();
        assert!(matches!(
            mgr.open(2099, 13, "ops"),
            Err(PeriodError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_transition_on_missing_period() {
        let mgr = manager();
        assert!(matches!(
            mgr.close_month(2099, 1, "ops"),
            Err(PeriodError::PeriodNotFound { .. })
        ));
    }

    #[test]
    fn test_full_lifecycle() {
        let mgr = manager();
        mgr.open(2099, 1, "ops").unwrap();

        let closed = mgr.close_month(2099, 1, "ops").unwrap();
        assert_eq!(closed.status, PeriodStatus::MonthClosed);

        let filed = mgr.file_tax(2099, 1, "ops").unwrap();
        assert_eq!(filed.status, PeriodStatus::TaxFiled);

        // Filed periods are immutable.
        assert!(matches!(
            mgr.reopen(2099, 1, "ops"),
            Err(PeriodError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reopen_from_month_closed() {
        let mgr = manager();
        mgr.open(2099, 2, "ops").unwrap();
        mgr.close_month(2099, 2, "ops").unwrap();

        let reopened = mgr.reopen(2099, 2, "ops").unwrap();
        assert_eq!(reopened.status, PeriodStatus::Open);
    }

    // Illegal edges, one by one.
    #[rstest]
    #[case::file_tax_from_open(PeriodTransition::FileTax)]
    #[case::reopen_from_open(PeriodTransition::Reopen)]
    fn test_illegal_from_open(#[case] transition: PeriodTransition) {
        let mgr = manager();
        mgr.open(2099, 3, "ops").unwrap();

        let result = match transition {
            PeriodTransition::FileTax => mgr.file_tax(2099, 3, "ops"),
            PeriodTransition::Reopen => mgr.reopen(2099, 3, "ops"),
            PeriodTransition::CloseMonth => unreachable!(),
        };
        assert!(matches!(result, Err(PeriodError::InvalidTransition { .. })));
        // Status unchanged after a rejected transition.
        assert_eq!(mgr.status(2099, 3), Some(PeriodStatus::Open));
    }

    #[test]
    fn test_close_month_twice_fails() {
        let mgr = manager();
        mgr.open(2099, 4, "ops").unwrap();
        mgr.close_month(2099, 4, "ops").unwrap();
        assert!(matches!(
            mgr.close_month(2099, 4, "ops"),
            Err(PeriodError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_list_year() {
        let mgr = manager();
        mgr.open(2099, 2, "ops").unwrap();
        mgr.open(2099, 1, "ops").unwrap();
        mgr.open(2100, 1, "ops").unwrap();

        let year = mgr.list_year(2099);
        assert_eq!(year.len(), 2);
        assert_eq!(year[0].code.month(), 1);
        assert_eq!(year[1].code.month(), 2);
    }

    #[test]
    fn test_transition_events_carry_old_and_new_state() {
        let sink = Arc::new(MemorySink::new());
        let mgr = PeriodManager::new(sink.clone());
        mgr.open(2099, 5, "ops").unwrap();
        mgr.close_month(2099, 5, "ops").unwrap();

        let events = sink.recorded();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::PeriodTransitioned { from, to, .. } => {
                assert_eq!(*from, PeriodStatus::Open);
                assert_eq!(*to, PeriodStatus::MonthClosed);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
