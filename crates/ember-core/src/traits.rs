//! Trait interfaces between Ember crates.
//!
//! - [`DecaySchedule`] — retention compounding math (ember-decay implements)
//!
//! The storage contract lives in [`crate::store::LedgerStore`].

use crate::constants::BPS_SCALE;
use crate::types::DecayProfile;

/// Pure computation of compounded retention factors and effective balances.
///
/// All arithmetic is unsigned-integer with truncating division so results are
/// bit-identical across platforms. Implemented by `DecayEngine` (ember-decay);
/// the ledger holds it as `Arc<dyn DecaySchedule>`.
pub trait DecaySchedule: Send + Sync {
    /// Compounded retention factor in basis points after `days` whole days at
    /// the per-day rate `rate_bps`.
    ///
    /// `rate_bps` must be in `0..=BPS_SCALE`; the result is then also in
    /// `0..=BPS_SCALE`. Zero elapsed days retain everything.
    fn retention_bps(&self, rate_bps: u64, days: u64) -> u64;

    /// Effective balance of `raw` under `profile` as of `now`.
    ///
    /// Pure read: nothing is committed. Zero raw balances and sub-day elapsed
    /// times pass through untouched; otherwise the compounded factor from
    /// [`retention_bps`](Self::retention_bps) is applied with a widened
    /// multiply before the truncating division.
    fn effective_balance(&self, raw: u64, profile: &DecayProfile, now: u64) -> u64 {
        if raw == 0 {
            return 0;
        }
        let days = profile.days_elapsed(now);
        if days == 0 {
            return raw;
        }
        let factor = self.retention_bps(profile.rate_bps, days);
        ((raw as u128 * factor as u128) / BPS_SCALE as u128) as u64
    }
}
