//! Ledger domain types: account identities, credit classes, decay profiles,
//! and audit events.
//!
//! All balances are unsigned credit units; all timestamps are Unix seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SECS_PER_DAY;
use crate::error::LedgerError;

/// An opaque 32-byte account identifier.
///
/// Ember never interprets the bytes: hosts may use public-key hashes,
/// registry ids, or any other 32-byte identity scheme. Rendered as
/// lowercase hex.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The all-zero id. Reserved; never assigned to an operator.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an AccountId from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an AccountId from an operator label (BLAKE3 of the UTF-8 bytes).
    pub fn from_label(label: &str) -> Self {
        Self(blake3::hash(label.as_bytes()).into())
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero id.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The closed set of credit classes tracked by the ledger.
///
/// Balances are kept per `(account, class)` pair. The storage and wire form
/// is the index byte from [`index`](Self::index); out-of-range indices are
/// rejected at the boundary by [`from_index`](Self::from_index).
///
/// # Examples
///
/// ```
/// use ember_core::types::CreditClass;
/// assert_eq!(CreditClass::from_index(1).unwrap(), CreditClass::Compliance);
/// assert!(CreditClass::from_index(5).is_err());
/// ```
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
#[repr(u8)]
pub enum CreditClass {
    /// Credits for verified efficiency improvements.
    Efficiency = 0,
    /// Credits for regulatory compliance attestations.
    Compliance = 1,
    /// Credits for innovation program participation.
    Innovation = 2,
}

impl CreditClass {
    /// Number of credit classes.
    pub const COUNT: usize = 3;

    /// Every class, in index order.
    pub const ALL: [CreditClass; CreditClass::COUNT] = [
        CreditClass::Efficiency,
        CreditClass::Compliance,
        CreditClass::Innovation,
    ];

    /// Storage/wire index of this class.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse a class from its index byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_core::types::CreditClass;
    /// for class in CreditClass::ALL {
    ///     assert_eq!(CreditClass::from_index(class.index()).unwrap(), class);
    /// }
    /// ```
    pub fn from_index(index: u8) -> Result<Self, LedgerError> {
        match index {
            0 => Ok(Self::Efficiency),
            1 => Ok(Self::Compliance),
            2 => Ok(Self::Innovation),
            other => Err(LedgerError::InvalidCreditClass(other)),
        }
    }

    /// Human-readable class name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Efficiency => "efficiency",
            Self::Compliance => "compliance",
            Self::Innovation => "innovation",
        }
    }
}

impl fmt::Display for CreditClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-account decay profile, shared by every credit class the account holds.
///
/// `rate_bps` is the per-day retention factor in basis points: 10_000 keeps
/// the full balance each day, 0 expires everything after one whole day.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct DecayProfile {
    /// Unix timestamp (seconds) of the last committed reconciliation or mutation.
    pub last_update: u64,
    /// Per-day retention factor in basis points, in `0..=10_000`.
    pub rate_bps: u64,
}

impl DecayProfile {
    /// Create a profile anchored at `last_update`.
    pub fn new(last_update: u64, rate_bps: u64) -> Self {
        Self {
            last_update,
            rate_bps,
        }
    }

    /// Whole days elapsed since the last committed update.
    ///
    /// Fractional days are dropped. A clock running behind `last_update`
    /// yields zero days rather than wrapping.
    pub fn days_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_update) / SECS_PER_DAY
    }
}

/// Audit events emitted by mutating ledger operations.
///
/// Events are drained by the embedding host (`Ledger::drain_events`); the
/// ledger keeps no persistent event log.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub enum LedgerEvent {
    /// Credits were minted into an account's raw balance.
    Awarded {
        account: AccountId,
        class: CreditClass,
        amount: u64,
    },
    /// An account's per-day retention rate changed.
    DecayRateUpdated { account: AccountId, rate_bps: u64 },
    /// A reconciliation commit expired `amount` credits from the raw balance.
    CreditsExpired {
        account: AccountId,
        class: CreditClass,
        amount: u64,
    },
    /// The metadata base URI changed.
    BaseMetadataUpdated { uri: String },
    /// The administrator identity was handed to a new account.
    AdminTransferred { previous: AccountId, next: AccountId },
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- AccountId ---

    #[test]
    fn account_id_zero_is_zero() {
        let id = AccountId::ZERO;
        assert!(id.is_zero());
        assert_eq!(id, AccountId::default());
    }

    #[test]
    fn account_id_nonzero_is_not_zero() {
        assert!(!AccountId([1; 32]).is_zero());
    }

    #[test]
    fn account_id_display_hex() {
        let id = AccountId([0xAB; 32]);
        let s = format!("{id}");
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(&s[0..2], "ab");
    }

    #[test]
    fn account_id_from_bytes() {
        let bytes = [42u8; 32];
        let id = AccountId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
        assert_eq!(AccountId::from(bytes), id);
    }

    #[test]
    fn account_id_from_label_deterministic() {
        assert_eq!(
            AccountId::from_label("grid-west-07"),
            AccountId::from_label("grid-west-07")
        );
        assert_ne!(
            AccountId::from_label("grid-west-07"),
            AccountId::from_label("grid-east-02")
        );
        assert!(!AccountId::from_label("grid-west-07").is_zero());
    }

    // --- CreditClass ---

    #[test]
    fn class_index_round_trip() {
        for class in CreditClass::ALL {
            assert_eq!(CreditClass::from_index(class.index()).unwrap(), class);
        }
    }

    #[test]
    fn class_indexes_are_dense() {
        for (i, class) in CreditClass::ALL.iter().enumerate() {
            assert_eq!(class.index() as usize, i);
        }
    }

    #[test]
    fn class_from_index_rejects_out_of_range() {
        for index in [3u8, 5, 255] {
            let err = CreditClass::from_index(index).unwrap_err();
            assert_eq!(err, LedgerError::InvalidCreditClass(index));
        }
    }

    #[test]
    fn class_labels_distinct() {
        assert_ne!(CreditClass::Efficiency.label(), CreditClass::Compliance.label());
        assert_ne!(CreditClass::Compliance.label(), CreditClass::Innovation.label());
        assert_eq!(format!("{}", CreditClass::Compliance), "compliance");
    }

    // --- DecayProfile ---

    #[test]
    fn days_elapsed_zero_when_fresh() {
        let p = DecayProfile::new(1_700_000_000, 9_000);
        assert_eq!(p.days_elapsed(1_700_000_000), 0);
    }

    #[test]
    fn days_elapsed_fractional_day_is_zero() {
        let p = DecayProfile::new(1_700_000_000, 9_000);
        assert_eq!(p.days_elapsed(1_700_000_000 + SECS_PER_DAY - 1), 0);
    }

    #[test]
    fn days_elapsed_at_exact_boundary() {
        let p = DecayProfile::new(1_700_000_000, 9_000);
        assert_eq!(p.days_elapsed(1_700_000_000 + SECS_PER_DAY), 1);
    }

    #[test]
    fn days_elapsed_many_days() {
        let p = DecayProfile::new(1_700_000_000, 9_000);
        assert_eq!(p.days_elapsed(1_700_000_000 + 7 * SECS_PER_DAY + 3), 7);
    }

    #[test]
    fn days_elapsed_clock_regression_is_zero() {
        let p = DecayProfile::new(1_700_000_000, 9_000);
        assert_eq!(p.days_elapsed(1_600_000_000), 0);
    }

    // --- Storage encoding ---

    #[test]
    fn bincode_round_trip_profile() {
        let p = DecayProfile::new(1_700_000_000, 9_990);
        let encoded = bincode::encode_to_vec(p, bincode::config::standard()).unwrap();
        let (decoded, _): (DecayProfile, usize) =
            bincode::decode_from_slice(&encoded, bincode::config::standard()).unwrap();
        assert_eq!(p, decoded);
    }
}
