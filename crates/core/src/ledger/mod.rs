//! Journal posting engine: balanced multi-line entries, posting
//! eligibility, immutable storage.

pub mod engine;
pub mod error;
pub mod types;
pub mod validation;

pub use engine::PostingEngine;
pub use error::PostingError;
pub use types::{EntryStatus, EntryTotals, JournalEntry, JournalLine, PostEntryInput};
