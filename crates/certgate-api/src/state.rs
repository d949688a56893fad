//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Every request serialises through one `parking_lot::Mutex` around the
//! ledger, which gives the service a single global transaction order.
//! The lock is never held across an `.await`.

use std::sync::Arc;

use certgate_registry::{Ledger, LedgerConfig, LedgerError};
use parking_lot::Mutex;

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Ledger parameters.
    pub ledger: LedgerConfig,
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    /// Wrap an existing ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Start from a fresh ledger built from `config`.
    pub fn from_config(config: LedgerConfig) -> Result<Self, LedgerError> {
        Ok(Self::new(Ledger::new(config)?))
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with_ledger<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        let mut guard = self.ledger.lock();
        f(&mut guard)
    }
}
