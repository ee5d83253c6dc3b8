//! Ledger service composition.
//!
//! [`LedgerService`] wires the durable RocksDB store, the decay engine, and
//! the ledger state machine behind a single `RwLock`. It exposes the
//! byte-level boundary hosts speak — class indexes arrive as `u8` and are
//! validated here before they reach the typed core.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use ember_core::error::LedgerError;
use ember_core::traits::DecaySchedule;
use ember_core::types::{AccountId, CreditClass, DecayProfile, LedgerEvent};
use ember_decay::DecayEngine;
use ember_ledger::Ledger;

use crate::config::LedgerConfig;
use crate::storage::RocksLedgerStore;

/// Thread-safe ledger service over durable storage.
///
/// Mutations hold the write lock for their whole reconcile-then-write
/// sequence, so per-account invariants cannot interleave; reads share the
/// read lock.
pub struct LedgerService {
    inner: RwLock<Ledger<RocksLedgerStore>>,
}

impl LedgerService {
    /// Open the service over the configured data directory.
    ///
    /// `admin` is instance configuration: it gates every mutation until a
    /// transfer, and a restart injects it afresh.
    pub fn open(config: &LedgerConfig, admin: AccountId) -> Result<Self, LedgerError> {
        let store = RocksLedgerStore::open(config.db_path())?;
        let schedule: Arc<dyn DecaySchedule> = Arc::new(DecayEngine::new());
        let ledger =
            Ledger::new(store, schedule, admin).with_default_rate(config.default_decay_rate_bps)?;
        info!(path = %config.db_path().display(), %admin, "ledger service opened");
        Ok(Self {
            inner: RwLock::new(ledger),
        })
    }

    /// Wrap an already-built ledger, e.g. one with an injected clock.
    pub fn with_ledger(ledger: Ledger<RocksLedgerStore>) -> Self {
        Self {
            inner: RwLock::new(ledger),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Award credits. `class_index` is validated at this boundary; nothing
    /// is written for an unknown index.
    pub fn award(
        &self,
        caller: &AccountId,
        account: AccountId,
        class_index: u8,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let class = CreditClass::from_index(class_index)?;
        self.inner.write().award(caller, account, class, amount)
    }

    /// Set an account's per-day retention rate.
    pub fn set_decay_rate(
        &self,
        caller: &AccountId,
        account: AccountId,
        rate_bps: u64,
    ) -> Result<(), LedgerError> {
        self.inner.write().set_decay_rate(caller, account, rate_bps)
    }

    /// Set the metadata base URI.
    pub fn set_base_metadata(&self, caller: &AccountId, uri: &str) -> Result<(), LedgerError> {
        self.inner.write().set_base_metadata(caller, uri)
    }

    /// Hand the administrator role to `next`.
    pub fn transfer_admin(&self, caller: &AccountId, next: AccountId) -> Result<(), LedgerError> {
        self.inner.write().transfer_admin(caller, next)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Decayed, currently-valid balance.
    pub fn effective_balance(
        &self,
        account: &AccountId,
        class_index: u8,
    ) -> Result<u64, LedgerError> {
        let class = CreditClass::from_index(class_index)?;
        self.inner.read().effective_balance(account, class)
    }

    /// Effective balances for every class, in class-index order.
    pub fn effective_balances(
        &self,
        account: &AccountId,
    ) -> Result<[u64; CreditClass::COUNT], LedgerError> {
        self.inner.read().effective_balances(account)
    }

    /// Stored raw balance, before decay.
    pub fn raw_balance(&self, account: &AccountId, class_index: u8) -> Result<u64, LedgerError> {
        let class = CreditClass::from_index(class_index)?;
        self.inner.read().raw_balance(account, class)
    }

    /// The account's decay profile, if it has one.
    pub fn decay_profile(&self, account: &AccountId) -> Result<Option<DecayProfile>, LedgerError> {
        self.inner.read().decay_profile(account)
    }

    /// The stored metadata base URI.
    pub fn base_metadata(&self) -> Result<Option<String>, LedgerError> {
        self.inner.read().base_metadata()
    }

    /// The current administrator account.
    pub fn admin(&self) -> AccountId {
        self.inner.read().admin()
    }

    /// Take every audit event recorded since the last drain. Each drained
    /// event is also emitted to the log stream.
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        let events = self.inner.write().drain_events();
        for event in &events {
            debug!(?event, "ledger event drained");
        }
        events
    }
}
