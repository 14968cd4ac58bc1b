//! The posting engine: validation, eligibility, atomic persistence.
//!
//! The engine is the exclusive owner of journal entries. Posting is the
//! unit of atomicity: all checks and the append of the entry with its lines
//! happen under one write section, so no partial entry is ever observable.
//! Period status is checked while holding the period table's read lock,
//! serializing posts against concurrent period transitions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use balans_shared::types::JournalEntryId;

use crate::account::AccountRegistry;
use crate::events::{DomainEvent, EventSink};
use crate::period::manager::PeriodTable;
use crate::period::{PeriodCode, PeriodManager};

use super::error::PostingError;
use super::types::{EntryStatus, JournalEntry, PostEntryInput};
use super::validation;

/// Which period statuses a posting attempt may pass through.
///
/// `AllowClosed` exists solely for the fiscal-year closing entry and is not
/// reachable from outside the crate; ordinary callers can never post into a
/// closed period.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PostingGate {
    /// Ordinary posting: the owning period must be `Open`.
    OpenOnly,
    /// Closing-entry posting: the period may be month-closed or tax-filed.
    AllowClosed,
}

struct JournalState {
    entries: Vec<JournalEntry>,
    index: HashMap<JournalEntryId, usize>,
    sequences: HashMap<PeriodCode, u32>,
}

/// Accepts balanced multi-line entries and enforces posting eligibility.
pub struct PostingEngine {
    registry: Arc<AccountRegistry>,
    periods: Arc<PeriodManager>,
    state: RwLock<JournalState>,
    events: Arc<dyn EventSink>,
}

impl PostingEngine {
    /// Creates an engine over the given registry and period manager.
    #[must_use]
    pub fn new(
        registry: Arc<AccountRegistry>,
        periods: Arc<PeriodManager>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            registry,
            periods,
            state: RwLock::new(JournalState {
                entries: Vec::new(),
                index: HashMap::new(),
                sequences: HashMap::new(),
            }),
            events,
        }
    }

    /// Posts a journal entry.
    ///
    /// Contract, in order: at least two well-formed lines; every account
    /// active and non-header; exact minor-unit balance; owning period
    /// exists and is `Open`; atomic persist with a per-period sequence.
    /// Entries are immutable once returned - corrections are reversing
    /// entries, never edits.
    ///
    /// # Errors
    ///
    /// The first violated rule, as a `PostingError`.
    pub fn post(&self, input: PostEntryInput) -> Result<JournalEntry, PostingError> {
        let entry = {
            let table = self.periods.read_table();
            self.post_with_table(&table, input, PostingGate::OpenOnly)?
        };
        self.announce(&entry);
        Ok(entry)
    }

    /// Posts under a caller-held period table guard.
    ///
    /// The closing process holds the guard across its readiness check,
    /// net-income computation, and this call, so periods cannot transition
    /// underneath a year closing. Callers publish the `EntryPosted` event
    /// via [`Self::announce`] after releasing the guard.
    pub(crate) fn post_with_table(
        &self,
        table: &PeriodTable,
        input: PostEntryInput,
        gate: PostingGate,
    ) -> Result<JournalEntry, PostingError> {
        let totals = validation::validate_lines(&input.lines)?;

        for line in &input.lines {
            let account = self
                .registry
                .lookup(&line.account)
                .map_err(|_| PostingError::AccountNotFound(line.account.clone()))?;
            if account.is_header {
                return Err(PostingError::HeaderAccountPosting(line.account.clone()));
            }
        }

        let code = PeriodCode::from_date(input.transaction_date);
        let period = table
            .get(&code)
            .ok_or(PostingError::PeriodNotFound(code))?;
        if matches!(gate, PostingGate::OpenOnly) && !period.status.accepts_postings() {
            return Err(PostingError::ClosedPeriod {
                period: code,
                status: period.status,
            });
        }

        // Atomic persist: the entry and all its lines land as one unit.
        let mut state = self.state.write();
        let sequence = state.sequences.entry(code).or_insert(0);
        *sequence += 1;
        let sequence = *sequence;

        let entry = JournalEntry {
            id: JournalEntryId::new(),
            transaction_date: input.transaction_date,
            period: code,
            sequence,
            description: input.description,
            reference_number: input.reference_number,
            status: EntryStatus::Posted,
            posted_by: input.posted_by,
            created_at: Utc::now(),
            lines: input.lines,
        };
        let entry_index = state.entries.len();
        state.index.insert(entry.id, entry_index);
        state.entries.push(entry.clone());
        drop(state);

        tracing::info!(
            entry_id = %entry.id,
            period = %code,
            sequence,
            debit_total = %totals.debit,
            "journal entry posted"
        );
        Ok(entry)
    }

    /// Publishes the `EntryPosted` event for a persisted entry.
    pub(crate) fn announce(&self, entry: &JournalEntry) {
        self.events.publish(DomainEvent::EntryPosted {
            entry_id: entry.id,
            period: entry.period,
            actor: entry.posted_by.clone(),
            at: Utc::now(),
        });
    }

    /// Reverses a posted entry.
    ///
    /// Posts the mirrored entry (debits and credits swapped, same accounts,
    /// the original's identifier as reference number) through the ordinary
    /// posting path - the reversal date must fall in an open period - then
    /// marks both entries `Void`. The pair stays in the journal as an
    /// immutable audit trail while derived balances see no net effect from
    /// either, since void entries are excluded from every aggregation.
    ///
    /// # Errors
    ///
    /// `EntryNotFound`, `AlreadyVoid`, or any ordinary posting error for
    /// the reversing entry.
    pub fn reverse(
        &self,
        id: JournalEntryId,
        transaction_date: NaiveDate,
        actor: &str,
    ) -> Result<JournalEntry, PostingError> {
        let original = self.entry(id).ok_or(PostingError::EntryNotFound(id))?;
        if original.status == EntryStatus::Void {
            return Err(PostingError::AlreadyVoid(id));
        }

        let input = PostEntryInput {
            transaction_date,
            description: format!("Reversal of entry {id}"),
            reference_number: Some(id.to_string()),
            lines: original.lines.iter().map(super::types::JournalLine::mirrored).collect(),
            posted_by: actor.to_string(),
        };
        let mut reversing = self.post(input)?;

        let mut state = self.state.write();
        if let Some(&i) = state.index.get(&id) {
            state.entries[i].status = EntryStatus::Void;
        }
        if let Some(&i) = state.index.get(&reversing.id) {
            state.entries[i].status = EntryStatus::Void;
        }
        drop(state);
        reversing.status = EntryStatus::Void;

        tracing::info!(original = %id, reversing = %reversing.id, "entry reversed");
        Ok(reversing)
    }

    /// Fetches an entry by id.
    #[must_use]
    pub fn entry(&self, id: JournalEntryId) -> Option<JournalEntry> {
        let state = self.state.read();
        state.index.get(&id).map(|&i| state.entries[i].clone())
    }

    /// Posted (non-void) entries with date in `[start, end]`.
    #[must_use]
    pub fn posted_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<JournalEntry> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|e| {
                e.status == EntryStatus::Posted
                    && e.transaction_date >= start
                    && e.transaction_date <= end
            })
            .cloned()
            .collect()
    }

    /// Posted (non-void) entries dated strictly before `date`.
    #[must_use]
    pub fn posted_before(&self, date: NaiveDate) -> Vec<JournalEntry> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted && e.transaction_date < date)
            .cloned()
            .collect()
    }

    /// Posted (non-void) entries whose owning period falls in `year`.
    #[must_use]
    pub fn posted_in_year(&self, year: i32) -> Vec<JournalEntry> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted && e.period.year() == year)
            .cloned()
            .collect()
    }
}
