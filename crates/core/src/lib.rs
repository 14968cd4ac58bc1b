//! Ledger core for Balans.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts registry
//! - `ledger` - Double-entry posting engine
//! - `period` - Fiscal period state machine
//! - `closing` - Fiscal year closing process
//! - `reports` - Cash-flow reporting
//! - `template` - Transaction templates
//! - `events` - Audit event boundary

pub mod account;
pub mod closing;
pub mod events;
pub mod ledger;
pub mod period;
pub mod reports;
pub mod template;

use std::sync::Arc;

use account::AccountRegistry;
use closing::ClosingProcess;
use events::EventSink;
use ledger::PostingEngine;
use period::PeriodManager;
use reports::CashFlowService;
use template::TemplateRegistry;

/// The wired ledger core.
///
/// Owns one instance of each subsystem, sharing the account registry and
/// period manager between the posting engine, the closing process, and the
/// report service, and a single event sink for the audit boundary.
pub struct Ledger {
    accounts: Arc<AccountRegistry>,
    periods: Arc<PeriodManager>,
    engine: Arc<PostingEngine>,
    templates: TemplateRegistry,
    closing: ClosingProcess,
    reports: CashFlowService,
}

impl Ledger {
    /// Wires a new ledger core around the given event sink.
    #[must_use]
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        let accounts = Arc::new(AccountRegistry::new(events.clone()));
        let periods = Arc::new(PeriodManager::new(events.clone()));
        let engine = Arc::new(PostingEngine::new(
            accounts.clone(),
            periods.clone(),
            events.clone(),
        ));
        let closing = ClosingProcess::new(
            periods.clone(),
            accounts.clone(),
            engine.clone(),
            events,
        );
        let reports = CashFlowService::new(accounts.clone(), engine.clone());

        Self {
            accounts,
            periods,
            engine,
            templates: TemplateRegistry::new(),
            closing,
            reports,
        }
    }

    /// The account registry.
    #[must_use]
    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    /// The fiscal period manager.
    #[must_use]
    pub fn periods(&self) -> &PeriodManager {
        &self.periods
    }

    /// The posting engine.
    #[must_use]
    pub fn journal(&self) -> &PostingEngine {
        &self.engine
    }

    /// The transaction template registry.
    #[must_use]
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// The fiscal year closing process.
    #[must_use]
    pub fn closing(&self) -> &ClosingProcess {
        &self.closing
    }

    /// The cash-flow report service.
    #[must_use]
    pub fn reports(&self) -> &CashFlowService {
        &self.reports
    }
}
