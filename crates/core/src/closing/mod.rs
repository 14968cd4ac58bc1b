//! Fiscal-year closing: one irreversible transition per year.

pub mod error;
pub mod service;
pub mod types;

pub use error::ClosingError;
pub use service::ClosingProcess;
pub use types::{ClosingPreview, ClosingStatus, FiscalYearClosing};
