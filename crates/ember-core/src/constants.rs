//! Ledger constants. All rates are per-day retention factors in basis points.

/// Basis-point scale: 10_000 basis points = 100%.
pub const BPS_SCALE: u64 = 10_000;

/// Seconds per decay day. Decay compounds only across whole-day boundaries;
/// fractional elapsed days leave balances untouched.
pub const SECS_PER_DAY: u64 = 86_400;

/// Retention rate assigned when an account receives its first award and has
/// no decay profile yet: 9_990 bps = 99.9% of the balance kept per day.
///
/// Instances may override it at construction via `LedgerConfig`.
///
/// # Examples
///
/// ```
/// use ember_core::constants::{BPS_SCALE, DEFAULT_DECAY_RATE_BPS};
/// assert!(DEFAULT_DECAY_RATE_BPS <= BPS_SCALE);
/// ```
pub const DEFAULT_DECAY_RATE_BPS: u64 = 9_990;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_within_scale() {
        assert!(DEFAULT_DECAY_RATE_BPS <= BPS_SCALE);
        assert!(DEFAULT_DECAY_RATE_BPS > 0);
    }

    #[test]
    fn default_rate_is_point_one_percent_daily_loss() {
        assert_eq!(BPS_SCALE - DEFAULT_DECAY_RATE_BPS, 10);
    }

    #[test]
    fn day_length() {
        assert_eq!(SECS_PER_DAY, 24 * 60 * 60);
    }
}
