//! Ledger storage interface and in-memory implementation.
//!
//! Provides the [`LedgerStore`] trait over the two persisted tables —
//! `(account, class) → raw balance` and `account → decay profile` — plus the
//! base-metadata entry. The [`MemoryLedgerStore`] is suitable for tests and
//! hosts that already own durability; the production store is RocksDB
//! (ember-service).
//!
//! Writes passed to [`LedgerStore::apply`] must already be validated and
//! reconciled by the ledger. The store only moves bytes.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::{AccountId, CreditClass, DecayProfile};

/// The writes produced by one ledger operation.
///
/// Applied atomically: either every write lands or none does. Balance writes
/// carry absolute values, not deltas, so applying a batch is idempotent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerDelta {
    /// New raw balances per `(account, class)`.
    pub balances: Vec<(AccountId, CreditClass, u64)>,
    /// New decay profiles per account.
    pub profiles: Vec<(AccountId, DecayProfile)>,
    /// New base-metadata URI, if the operation changed it.
    pub base_metadata: Option<String>,
}

impl LedgerDelta {
    /// Whether the batch contains no writes.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.profiles.is_empty() && self.base_metadata.is_none()
    }
}

/// Mutable ledger storage interface.
///
/// Not thread-safe — callers should wrap in a `Mutex` or `RwLock` if
/// concurrent access is needed.
pub trait LedgerStore: Send + Sync {
    /// Raw (pre-decay) balance for an account and class. Zero if absent.
    fn raw_balance(&self, account: &AccountId, class: CreditClass) -> Result<u64, StoreError>;

    /// Decay profile for an account. `None` if the account was never awarded
    /// or rate-configured.
    fn profile(&self, account: &AccountId) -> Result<Option<DecayProfile>, StoreError>;

    /// The stored base-metadata URI, if one was set.
    fn base_metadata(&self) -> Result<Option<String>, StoreError>;

    /// Apply a write batch atomically.
    fn apply(&mut self, delta: LedgerDelta) -> Result<(), StoreError>;

    /// Raw balances for every class, in class-index order.
    ///
    /// Default implementation reads each class in turn.
    fn raw_balances(&self, account: &AccountId) -> Result<[u64; CreditClass::COUNT], StoreError> {
        let mut out = [0u64; CreditClass::COUNT];
        for class in CreditClass::ALL {
            out[class.index() as usize] = self.raw_balance(account, class)?;
        }
        Ok(out)
    }
}

/// In-memory ledger storage.
///
/// Stores everything in `HashMap`s with no persistence: suitable for tests
/// and short-lived embedded ledgers.
pub struct MemoryLedgerStore {
    /// Raw balances: `(account, class) → value`.
    balances: HashMap<(AccountId, CreditClass), u64>,
    /// Decay profiles per account.
    profiles: HashMap<AccountId, DecayProfile>,
    /// Base-metadata URI.
    base_metadata: Option<String>,
}

impl MemoryLedgerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            profiles: HashMap::new(),
            base_metadata: None,
        }
    }

    /// Number of `(account, class)` balance entries present, including zeros
    /// committed by reconciliation.
    pub fn balance_entries(&self) -> usize {
        self.balances.len()
    }

    /// Number of accounts with a decay profile.
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn raw_balance(&self, account: &AccountId, class: CreditClass) -> Result<u64, StoreError> {
        Ok(self.balances.get(&(*account, class)).copied().unwrap_or(0))
    }

    fn profile(&self, account: &AccountId) -> Result<Option<DecayProfile>, StoreError> {
        Ok(self.profiles.get(account).copied())
    }

    fn base_metadata(&self) -> Result<Option<String>, StoreError> {
        Ok(self.base_metadata.clone())
    }

    fn apply(&mut self, delta: LedgerDelta) -> Result<(), StoreError> {
        for (account, class, value) in delta.balances {
            self.balances.insert((account, class), value);
        }
        for (account, profile) in delta.profiles {
            self.profiles.insert(account, profile);
        }
        if let Some(uri) = delta.base_metadata {
            self.base_metadata = Some(uri);
        }
        Ok(())
    }
}
