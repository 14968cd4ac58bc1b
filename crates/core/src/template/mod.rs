//! Transaction templates: named debit/credit account pairs.
//!
//! A template lets a caller post a routine two-line entry by id and amount
//! instead of spelling out the lines.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use balans_shared::types::{Money, TemplateId};

use crate::account::AccountCode;
use crate::ledger::JournalLine;

/// A reusable two-line posting pattern.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionTemplate {
    /// Template identifier.
    pub id: TemplateId,
    /// Display name (e.g. "Cash sale").
    pub name: String,
    /// Account debited when the template is applied.
    pub debit_account: AccountCode,
    /// Account credited when the template is applied.
    pub credit_account: AccountCode,
    /// Default entry description.
    pub description: String,
}

impl TransactionTemplate {
    /// Expands the template into entry lines for the given amount.
    ///
    /// The amount itself is validated by the posting engine.
    #[must_use]
    pub fn lines(&self, amount: Money) -> Vec<JournalLine> {
        vec![
            JournalLine::debit(self.debit_account.clone(), amount),
            JournalLine::credit(self.credit_account.clone(), amount),
        ]
    }
}

/// Input for creating a template.
#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    /// Display name.
    pub name: String,
    /// Account to debit.
    pub debit_account: AccountCode,
    /// Account to credit.
    pub credit_account: AccountCode,
    /// Default entry description.
    pub description: String,
}

/// Errors for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found.
    #[error("Transaction template not found: {0}")]
    TemplateNotFound(TemplateId),
}

impl TemplateError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::TemplateNotFound(_) => 404,
        }
    }
}

/// In-memory template registry.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<TemplateId, Arc<TransactionTemplate>>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a template and returns it.
    pub fn create(&self, input: CreateTemplateInput) -> TransactionTemplate {
        let template = TransactionTemplate {
            id: TemplateId::new(),
            name: input.name,
            debit_account: input.debit_account,
            credit_account: input.credit_account,
            description: input.description,
        };
        self.templates
            .write()
            .insert(template.id, Arc::new(template.clone()));
        tracing::info!(template_id = %template.id, name = %template.name, "template created");
        template
    }

    /// Looks up a template by id.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for an unknown id.
    pub fn lookup(&self, id: TemplateId) -> Result<TransactionTemplate, TemplateError> {
        self.templates
            .read()
            .get(&id)
            .map(|t| (**t).clone())
            .ok_or(TemplateError::TemplateNotFound(id))
    }

    /// Lists templates sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<TransactionTemplate> {
        let mut templates: Vec<TransactionTemplate> = self
            .templates
            .read()
            .values()
            .map(|t| (**t).clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }
}
