//! Retention compounding in basis points.
//!
//! All arithmetic is unsigned-integer with truncating division. The
//! compounded factor comes from a day-by-day multiply-then-divide loop:
//! truncation happens once per elapsed day, and that per-day rounding is part
//! of the observable contract, so the loop must not be replaced by a
//! closed-form power.

use ember_core::constants::BPS_SCALE;

/// Compounded retention factor after `days` whole days at `rate_bps` per day.
///
/// The factor is `rate_bps` for the first day, then `factor * rate_bps /
/// 10_000` (truncating) for each further day. Zero elapsed days retain
/// everything.
///
/// `rate_bps` must be in `0..=BPS_SCALE`; the result is then in
/// `0..=BPS_SCALE`.
///
/// The loop needs no day cap: a rate below `BPS_SCALE` shrinks the factor by
/// at least 1 per step, so it exhausts to zero within `rate_bps` iterations,
/// and full retention returns early.
///
/// # Examples
///
/// ```
/// use ember_decay::retention::compound_retention_bps;
/// assert_eq!(compound_retention_bps(9_000, 0), 10_000);
/// assert_eq!(compound_retention_bps(9_000, 1), 9_000);
/// assert_eq!(compound_retention_bps(9_000, 2), 8_100);
/// ```
pub fn compound_retention_bps(rate_bps: u64, days: u64) -> u64 {
    if days == 0 || rate_bps == BPS_SCALE {
        return BPS_SCALE;
    }
    let mut factor = rate_bps;
    for _ in 1..days {
        if factor == 0 {
            break;
        }
        // factor and rate_bps are both below 10_000 here; the product fits u64.
        factor = factor * rate_bps / BPS_SCALE;
    }
    factor
}

/// Apply a retention factor to a raw balance: `floor(raw * factor / 10_000)`.
///
/// `factor_bps` must be in `0..=BPS_SCALE`. The multiply is widened to u128
/// so a full-scale `raw` cannot overflow.
///
/// # Examples
///
/// ```
/// use ember_decay::retention::apply_retention;
/// assert_eq!(apply_retention(1_000, 9_000), 900);
/// assert_eq!(apply_retention(u64::MAX, 10_000), u64::MAX);
/// ```
pub fn apply_retention(raw: u64, factor_bps: u64) -> u64 {
    ((raw as u128 * factor_bps as u128) / BPS_SCALE as u128) as u64
}
