//! Shared test helpers for Ember integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ember_core::constants::SECS_PER_DAY;
use ember_core::store::MemoryLedgerStore;
use ember_core::types::AccountId;
use ember_decay::DecayEngine;
use ember_ledger::Ledger;

/// Fixed test epoch: 2023-11-14T22:13:20Z.
pub const T0: u64 = 1_700_000_000;

/// Simple account id from a seed byte.
pub fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

/// The administrator identity used across the suite.
pub fn admin() -> AccountId {
    AccountId::from_label("ember-tests-admin")
}

/// A shared, manually-advanced clock.
#[derive(Clone)]
pub struct TestClock(Arc<AtomicU64>);

impl TestClock {
    pub fn new(start: u64) -> Self {
        Self(Arc::new(AtomicU64::new(start)))
    }

    /// Current reading, in Unix seconds.
    pub fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn advance_days(&self, days: u64) {
        self.0.fetch_add(days * SECS_PER_DAY, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

/// In-memory ledger driven by a [`TestClock`] starting at [`T0`].
pub fn test_ledger() -> (Ledger<MemoryLedgerStore>, TestClock) {
    let clock = TestClock::new(T0);
    let handle = clock.clone();
    let ledger = Ledger::with_clock(
        MemoryLedgerStore::new(),
        Arc::new(DecayEngine::new()),
        admin(),
        move || handle.now(),
    );
    (ledger, clock)
}
