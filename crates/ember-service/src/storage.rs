//! RocksDB-backed persistent ledger storage.
//!
//! Implements [`LedgerStore`] using RocksDB column families for raw
//! balances, decay profiles, and instance metadata. All mutations go through
//! an atomic [`WriteBatch`], so a ledger operation either lands in full or
//! not at all.

use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use tracing::debug;

use ember_core::error::StoreError;
use ember_core::store::{LedgerDelta, LedgerStore};
use ember_core::types::{AccountId, CreditClass, DecayProfile};

// --- Column family names ---

const CF_BALANCES: &str = "balances";
const CF_PROFILES: &str = "profiles";
const CF_META: &str = "meta";

/// All column family names.
const ALL_CFS: &[&str] = &[CF_BALANCES, CF_PROFILES, CF_META];

// --- Metadata keys ---

const META_BASE_METADATA: &[u8] = b"base_metadata";

/// RocksDB-backed persistent ledger storage.
///
/// Balances are keyed by `account || class index` (33 bytes) and stored as
/// little-endian u64; profiles are bincode-encoded per account.
pub struct RocksLedgerStore {
    db: DB,
}

impl RocksLedgerStore {
    /// Open or create a RocksDB database at the given path.
    ///
    /// Creates all column families if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }

    /// Flush all in-memory buffers to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        debug!("ledger store flushed");
        Ok(())
    }

    // --- Internal helpers ---

    /// Get a column family handle.
    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("missing column family: {name}")))
    }

    /// Encode a balance key: account (32 bytes) || class index (1 byte).
    fn balance_key(account: &AccountId, class: CreditClass) -> [u8; 33] {
        let mut key = [0u8; 33];
        key[0..32].copy_from_slice(account.as_bytes());
        key[32] = class.index();
        key
    }
}

impl LedgerStore for RocksLedgerStore {
    fn raw_balance(&self, account: &AccountId, class: CreditClass) -> Result<u64, StoreError> {
        let cf = self.cf_handle(CF_BALANCES)?;
        match self
            .db
            .get_cf(&cf, Self::balance_key(account, class))
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) if bytes.len() == 8 => Ok(u64::from_le_bytes(bytes.try_into().unwrap())),
            Some(bytes) => Err(StoreError::Corrupt {
                entity: "balance",
                detail: format!("expected 8 bytes, found {}", bytes.len()),
            }),
            None => Ok(0),
        }
    }

    fn profile(&self, account: &AccountId) -> Result<Option<DecayProfile>, StoreError> {
        let cf = self.cf_handle(CF_PROFILES)?;
        match self
            .db
            .get_cf(&cf, account.as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => {
                let (profile, _): (DecayProfile, _) =
                    bincode::decode_from_slice(&bytes, bincode::config::standard()).map_err(
                        |e| StoreError::Corrupt {
                            entity: "profile",
                            detail: e.to_string(),
                        },
                    )?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    fn base_metadata(&self) -> Result<Option<String>, StoreError> {
        let cf = self.cf_handle(CF_META)?;
        match self
            .db
            .get_cf(&cf, META_BASE_METADATA)
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => {
                let uri = String::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
                    entity: "base metadata",
                    detail: e.to_string(),
                })?;
                Ok(Some(uri))
            }
            None => Ok(None),
        }
    }

    fn apply(&mut self, delta: LedgerDelta) -> Result<(), StoreError> {
        let cf_balances = self.cf_handle(CF_BALANCES)?;
        let cf_profiles = self.cf_handle(CF_PROFILES)?;
        let cf_meta = self.cf_handle(CF_META)?;

        let mut batch = WriteBatch::default();
        for (account, class, value) in &delta.balances {
            batch.put_cf(
                cf_balances,
                Self::balance_key(account, *class),
                value.to_le_bytes(),
            );
        }
        for (account, profile) in &delta.profiles {
            let bytes = bincode::encode_to_vec(profile, bincode::config::standard())
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            batch.put_cf(cf_profiles, account.as_bytes(), &bytes);
        }
        if let Some(uri) = &delta.base_metadata {
            batch.put_cf(cf_meta, META_BASE_METADATA, uri.as_bytes());
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
