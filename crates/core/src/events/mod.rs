//! Domain events for audit consumption.
//!
//! Every successful post and every period/year transition emits one
//! immutable event record, handed to an external append-only sink through
//! the narrow [`EventSink`] interface. The core never reads events back.

use chrono::{DateTime, Utc};

use balans_shared::types::JournalEntryId;

use crate::account::AccountCode;
use crate::period::{PeriodCode, PeriodStatus};

/// An immutable audit event.
///
/// A tagged union of event kinds; no type hierarchy, just data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A journal entry was posted.
    EntryPosted {
        /// The stored entry's identifier.
        entry_id: JournalEntryId,
        /// The owning fiscal period.
        period: PeriodCode,
        /// Who posted it.
        actor: String,
        /// When the event occurred.
        at: DateTime<Utc>,
    },
    /// A fiscal period changed status.
    PeriodTransitioned {
        /// The period that transitioned.
        period: PeriodCode,
        /// Status before the transition.
        from: PeriodStatus,
        /// Status after the transition.
        to: PeriodStatus,
        /// Who requested the transition.
        actor: String,
        /// When the event occurred.
        at: DateTime<Utc>,
    },
    /// A fiscal year was closed.
    YearClosed {
        /// The closed year.
        year: i32,
        /// The closing entry, if the year had nominal activity.
        closing_entry: Option<JournalEntryId>,
        /// Who executed the closing.
        actor: String,
        /// When the event occurred.
        at: DateTime<Utc>,
    },
    /// An account was created.
    AccountCreated {
        /// The new account's code.
        code: AccountCode,
        /// Who created it.
        actor: String,
        /// When the event occurred.
        at: DateTime<Utc>,
    },
    /// An account was deactivated.
    AccountDeactivated {
        /// The deactivated account's code.
        code: AccountCode,
        /// Who deactivated it.
        actor: String,
        /// When the event occurred.
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Returns the event kind as a stable string for sinks that index by kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EntryPosted { .. } => "ENTRY_POSTED",
            Self::PeriodTransitioned { .. } => "PERIOD_TRANSITIONED",
            Self::YearClosed { .. } => "YEAR_CLOSED",
            Self::AccountCreated { .. } => "ACCOUNT_CREATED",
            Self::AccountDeactivated { .. } => "ACCOUNT_DEACTIVATED",
        }
    }
}

/// Narrow publish interface to the external audit collaborator.
pub trait EventSink: Send + Sync {
    /// Hands one event to the sink. Must not block.
    fn publish(&self, event: DomainEvent);
}

/// Sink that writes events to the tracing pipeline.
///
/// The default sink in the server binary; the external log collector picks
/// events up from structured log output.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: DomainEvent) {
        tracing::info!(kind = event.kind(), event = ?event, "domain event");
    }
}

/// Sink that records events in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: parking_lot::Mutex<Vec<DomainEvent>>,
}

impl MemorySink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events in publish order.
    #[must_use]
    pub fn recorded(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }

    /// Returns how many events of the given kind were recorded.
    #[must_use]
    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: DomainEvent) {
        self.events.lock().push(event);
    }
}
