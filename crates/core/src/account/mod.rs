//! Chart of accounts: validated account hierarchy and registry.

pub mod error;
pub mod registry;
pub mod types;

pub use error::AccountError;
pub use registry::AccountRegistry;
pub use types::{Account, AccountCode, AccountSubtype, AccountType, CreateAccountInput, NormalBalance};
