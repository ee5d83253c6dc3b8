//! Decay engine implementing the [`DecaySchedule`] trait.
//!
//! Wraps the stepwise retention arithmetic from [`retention`](crate::retention)
//! behind the trait seam the ledger consumes. Stateless; share it freely.

use ember_core::traits::DecaySchedule;

use crate::retention::compound_retention_bps;

/// The production decay schedule.
///
/// Implements [`DecaySchedule`] with the day-by-day compounding loop, so the
/// per-day truncation order is exactly the one balances are reconciled with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecayEngine;

impl DecayEngine {
    /// Create a new DecayEngine.
    pub fn new() -> Self {
        Self
    }
}

impl DecaySchedule for DecayEngine {
    fn retention_bps(&self, rate_bps: u64, days: u64) -> u64 {
        compound_retention_bps(rate_bps, days)
    }
}
