//! Ledger state machine: validation, decay commits, and event emission.
//!
//! Every mutation follows the same sequence: gate on the administrator,
//! validate inputs, reconcile pending decay for the touched balances under
//! the rate that was in force while the time elapsed, then apply one atomic
//! write batch and record audit events. A failed operation applies nothing.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use ember_core::constants::{BPS_SCALE, DEFAULT_DECAY_RATE_BPS};
use ember_core::error::LedgerError;
use ember_core::store::{LedgerDelta, LedgerStore};
use ember_core::traits::DecaySchedule;
use ember_core::types::{AccountId, CreditClass, DecayProfile, LedgerEvent};

/// The decaying-balance ledger.
///
/// Owns its storage exclusively. Not thread-safe — hosts that serve
/// concurrent callers should wrap the whole ledger in a `Mutex` or `RwLock`
/// so that reconcile-then-write sequences cannot interleave.
pub struct Ledger<S> {
    store: S,
    schedule: Arc<dyn DecaySchedule>,
    admin: AccountId,
    default_rate_bps: u64,
    clock: Box<dyn Fn() -> u64 + Send + Sync>,
    journal: Vec<LedgerEvent>,
}

impl<S> fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("admin", &self.admin)
            .field("default_rate_bps", &self.default_rate_bps)
            .finish_non_exhaustive()
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Create a ledger over `store` with the system clock.
    pub fn new(store: S, schedule: Arc<dyn DecaySchedule>, admin: AccountId) -> Self {
        Self::with_clock(store, schedule, admin, || {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs()
        })
    }

    /// Create a ledger with a custom clock for testing. The clock returns
    /// Unix seconds.
    pub fn with_clock(
        store: S,
        schedule: Arc<dyn DecaySchedule>,
        admin: AccountId,
        clock: impl Fn() -> u64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            schedule,
            admin,
            default_rate_bps: DEFAULT_DECAY_RATE_BPS,
            clock: Box::new(clock),
            journal: Vec::new(),
        }
    }

    /// Override the retention rate assigned to accounts on their first
    /// award. Rejects rates above [`BPS_SCALE`].
    pub fn with_default_rate(mut self, rate_bps: u64) -> Result<Self, LedgerError> {
        if rate_bps > BPS_SCALE {
            return Err(LedgerError::InvalidRate {
                got: rate_bps,
                max: BPS_SCALE,
            });
        }
        self.default_rate_bps = rate_bps;
        Ok(self)
    }

    /// The current administrator account.
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    /// The retention rate assigned to accounts on first award.
    pub fn default_rate_bps(&self) -> u64 {
        self.default_rate_bps
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if *caller != self.admin {
            return Err(LedgerError::NotAdmin(*caller));
        }
        Ok(())
    }

    /// Anchor for the profile written by a commit. `last_update` never moves
    /// backwards, even if the host clock does.
    fn commit_anchor(existing: Option<&DecayProfile>, now: u64) -> u64 {
        match existing {
            Some(profile) => now.max(profile.last_update),
            None => now,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Mint `amount` credits of `class` into `account`.
    ///
    /// Pending decay is committed for the awarded class only, under the
    /// account's current rate, before the new credits land; the raw balance
    /// becomes `decayed + amount` and `last_update` advances to now. Sibling
    /// classes are not written, so any decay they have accrued is absorbed
    /// by the advanced anchor rather than burned — the next rate change
    /// settles them. Accounts seen for the first time get a profile at the
    /// instance default rate.
    ///
    /// Fails with [`LedgerError::NotAdmin`] for non-admin callers,
    /// [`LedgerError::InvalidAmount`] for a zero amount, and
    /// [`LedgerError::BalanceOverflow`] if the committed balance plus
    /// `amount` exceeds `u64::MAX`. Nothing is written on failure.
    pub fn award(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        class: CreditClass,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let now = (self.clock)();
        let raw = self.store.raw_balance(&account, class)?;
        let existing = self.store.profile(&account)?;
        let (rate_bps, committed) = match &existing {
            Some(profile) => (
                profile.rate_bps,
                self.schedule.effective_balance(raw, profile, now),
            ),
            None => (self.default_rate_bps, raw),
        };
        let expired = raw.saturating_sub(committed);
        let new_raw = committed
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account, class })?;
        let anchor = Self::commit_anchor(existing.as_ref(), now);

        self.store.apply(LedgerDelta {
            balances: vec![(account, class, new_raw)],
            profiles: vec![(account, DecayProfile::new(anchor, rate_bps))],
            base_metadata: None,
        })?;

        if expired > 0 {
            self.journal.push(LedgerEvent::CreditsExpired {
                account,
                class,
                amount: expired,
            });
            debug!(%account, %class, amount = expired, "credits expired");
        }
        self.journal.push(LedgerEvent::Awarded {
            account,
            class,
            amount,
        });
        debug!(%account, %class, amount, raw = new_raw, "credits awarded");
        Ok(())
    }

    /// Set `account`'s per-day retention rate, in basis points.
    ///
    /// Every class the account holds is reconciled under the *old* rate
    /// first, so days that already elapsed cannot be re-priced; the new
    /// rate applies from now on. An account without a profile gets one with
    /// the new rate and nothing to reconcile.
    ///
    /// Fails with [`LedgerError::NotAdmin`] for non-admin callers and
    /// [`LedgerError::InvalidRate`] if `rate_bps` exceeds [`BPS_SCALE`].
    /// Nothing is written on failure.
    pub fn set_decay_rate(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        rate_bps: u64,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        if rate_bps > BPS_SCALE {
            return Err(LedgerError::InvalidRate {
                got: rate_bps,
                max: BPS_SCALE,
            });
        }

        let now = (self.clock)();
        let existing = self.store.profile(&account)?;
        let mut delta = LedgerDelta::default();
        let mut expirations: Vec<(CreditClass, u64)> = Vec::new();
        if let Some(profile) = &existing {
            let raws = self.store.raw_balances(&account)?;
            for class in CreditClass::ALL {
                let raw = raws[class.index() as usize];
                if raw == 0 {
                    continue;
                }
                let committed = self.schedule.effective_balance(raw, profile, now);
                let expired = raw.saturating_sub(committed);
                if expired > 0 {
                    delta.balances.push((account, class, committed));
                    expirations.push((class, expired));
                }
            }
        }
        let anchor = Self::commit_anchor(existing.as_ref(), now);
        delta.profiles.push((account, DecayProfile::new(anchor, rate_bps)));
        self.store.apply(delta)?;

        for (class, amount) in expirations {
            self.journal.push(LedgerEvent::CreditsExpired {
                account,
                class,
                amount,
            });
            debug!(%account, %class, amount, "credits expired");
        }
        self.journal.push(LedgerEvent::DecayRateUpdated { account, rate_bps });
        info!(%account, rate_bps, "decay rate updated");
        Ok(())
    }

    /// Set the base URI used to resolve per-class credit metadata.
    pub fn set_base_metadata(&mut self, caller: &AccountId, uri: &str) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        self.store.apply(LedgerDelta {
            base_metadata: Some(uri.to_string()),
            ..LedgerDelta::default()
        })?;
        self.journal.push(LedgerEvent::BaseMetadataUpdated {
            uri: uri.to_string(),
        });
        debug!(uri, "base metadata updated");
        Ok(())
    }

    /// Hand the administrator role to `next`.
    ///
    /// The admin identity is instance configuration, not ledger state; a
    /// restarted host injects its configured admin again.
    pub fn transfer_admin(
        &mut self,
        caller: &AccountId,
        next: AccountId,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        let previous = self.admin;
        self.admin = next;
        self.journal.push(LedgerEvent::AdminTransferred { previous, next });
        info!(%previous, %next, "ledger administrator transferred");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Decayed, currently-valid balance for `(account, class)`.
    ///
    /// Pure: elapsed decay is folded into the answer without committing
    /// anything, so repeated queries at the same instant agree and storage
    /// is untouched. An account without a profile is reported undecayed.
    pub fn effective_balance(
        &self,
        account: &AccountId,
        class: CreditClass,
    ) -> Result<u64, LedgerError> {
        let raw = self.store.raw_balance(account, class)?;
        match self.store.profile(account)? {
            Some(profile) => Ok(self.schedule.effective_balance(raw, &profile, (self.clock)())),
            None => Ok(raw),
        }
    }

    /// Effective balances for every class, in class-index order, computed
    /// against a single clock reading.
    pub fn effective_balances(
        &self,
        account: &AccountId,
    ) -> Result<[u64; CreditClass::COUNT], LedgerError> {
        let raws = self.store.raw_balances(account)?;
        let profile = self.store.profile(account)?;
        let now = (self.clock)();
        let mut out = [0u64; CreditClass::COUNT];
        for class in CreditClass::ALL {
            let raw = raws[class.index() as usize];
            out[class.index() as usize] = match &profile {
                Some(p) => self.schedule.effective_balance(raw, p, now),
                None => raw,
            };
        }
        Ok(out)
    }

    /// Stored raw balance, before decay.
    pub fn raw_balance(&self, account: &AccountId, class: CreditClass) -> Result<u64, LedgerError> {
        Ok(self.store.raw_balance(account, class)?)
    }

    /// The account's decay profile. `None` until the account is first
    /// awarded or rate-configured.
    pub fn decay_profile(&self, account: &AccountId) -> Result<Option<DecayProfile>, LedgerError> {
        Ok(self.store.profile(account)?)
    }

    /// The stored metadata base URI, if one was set.
    pub fn base_metadata(&self) -> Result<Option<String>, LedgerError> {
        Ok(self.store.base_metadata()?)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Take every audit event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Events recorded and not yet drained.
    pub fn pending_events(&self) -> &[LedgerEvent] {
        &self.journal
    }
}
