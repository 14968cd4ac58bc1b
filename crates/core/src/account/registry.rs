//! In-memory account registry.
//!
//! The registry is the exclusive owner of account records. Balances are
//! never stored here; they are always derived from the journal.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::events::{DomainEvent, EventSink};

use super::error::AccountError;
use super::types::{Account, AccountCode, CreateAccountInput};

/// Validated hierarchy of accounts.
pub struct AccountRegistry {
    accounts: RwLock<HashMap<AccountCode, Account>>,
    events: Arc<dyn EventSink>,
}

impl AccountRegistry {
    /// Creates an empty registry publishing to the given sink.
    #[must_use]
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Creates a new account.
    ///
    /// A parent, when given, must already exist and be active. Since parents
    /// are validated at creation time and are immutable afterwards, the
    /// account tree cannot form a cycle.
    ///
    /// # Errors
    ///
    /// `DuplicateCode` if the code is taken, `ParentNotFound` /
    /// `ParentInactive` for a bad parent reference.
    pub fn create(&self, input: CreateAccountInput, actor: &str) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write();

        if accounts.contains_key(&input.code) {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent) = &input.parent {
            match accounts.get(parent) {
                None => return Err(AccountError::ParentNotFound(parent.clone())),
                Some(p) if !p.active => return Err(AccountError::ParentInactive(parent.clone())),
                Some(_) => {}
            }
        }

        let account = Account {
            code: input.code.clone(),
            name: input.name,
            account_type: input.account_type,
            normal_balance: input.normal_balance,
            is_header: input.is_header,
            active: true,
            parent: input.parent,
            subtype: input.subtype,
            created_at: Utc::now(),
        };
        accounts.insert(input.code.clone(), account.clone());
        drop(accounts);

        tracing::info!(code = %account.code, account_type = %account.account_type, "account created");
        self.events.publish(DomainEvent::AccountCreated {
            code: input.code,
            actor: actor.to_string(),
            at: Utc::now(),
        });

        Ok(account)
    }

    /// Deactivates an account (soft delete).
    ///
    /// Accounts referenced by posted entries are never removed, only
    /// deactivated; an inactive account rejects further postings and is
    /// hidden from `lookup`.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the code is unknown or the account is already
    /// inactive.
    pub fn deactivate(&self, code: &AccountCode, actor: &str) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write();

        let account = accounts
            .get_mut(code)
            .filter(|a| a.active)
            .ok_or_else(|| AccountError::AccountNotFound(code.clone()))?;
        account.active = false;
        let snapshot = account.clone();
        drop(accounts);

        tracing::info!(code = %code, "account deactivated");
        self.events.publish(DomainEvent::AccountDeactivated {
            code: code.clone(),
            actor: actor.to_string(),
            at: Utc::now(),
        });

        Ok(snapshot)
    }

    /// Looks up an active account by code.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the code is unknown or the account is inactive.
    pub fn lookup(&self, code: &AccountCode) -> Result<Account, AccountError> {
        self.accounts
            .read()
            .get(code)
            .filter(|a| a.active)
            .cloned()
            .ok_or_else(|| AccountError::AccountNotFound(code.clone()))
    }

    /// Looks up an account by code, including inactive accounts.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the code is unknown.
    pub fn lookup_any(&self, code: &AccountCode) -> Result<Account, AccountError> {
        self.accounts
            .read()
            .get(code)
            .cloned()
            .ok_or_else(|| AccountError::AccountNotFound(code.clone()))
    }

    /// Lists accounts ordered by code.
    #[must_use]
    pub fn list(&self, include_inactive: bool) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .read()
            .values()
            .filter(|a| include_inactive || a.active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }
}
