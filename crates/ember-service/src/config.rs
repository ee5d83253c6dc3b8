//! Service configuration for the Ember ledger.
//!
//! Provides [`LedgerConfig`] with defaults for the data directory and the
//! retention rate assigned to first-seen accounts. The configuration can be
//! customized programmatically or deserialized from a config file; binaries
//! layer command-line overrides on top.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ember_core::constants::DEFAULT_DECAY_RATE_BPS;

/// Configuration for a ledger service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Retention rate assigned to accounts on their first award, in basis
    /// points per day.
    pub default_decay_rate_bps: u64,
    /// Log level filter string (e.g. "info", "debug", "ember_service=trace").
    /// Binaries use it as the subscriber filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ember");

        Self {
            data_dir,
            default_decay_rate_bps: DEFAULT_DECAY_RATE_BPS,
            log_level: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Path to the RocksDB ledger data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("ledgerdata")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_matches_workspace_default() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.default_decay_rate_bps, DEFAULT_DECAY_RATE_BPS);
    }

    #[test]
    fn default_log_level_is_info() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn default_data_dir_ends_with_ember() {
        let cfg = LedgerConfig::default();
        assert!(
            cfg.data_dir.ends_with("ember"),
            "data_dir should end with 'ember': {:?}",
            cfg.data_dir
        );
    }

    #[test]
    fn db_path_appends_ledgerdata() {
        let cfg = LedgerConfig {
            data_dir: PathBuf::from("/tmp/ember-test"),
            ..LedgerConfig::default()
        };
        assert_eq!(cfg.db_path(), PathBuf::from("/tmp/ember-test/ledgerdata"));
    }

    #[test]
    fn config_is_clone_and_debug() {
        let cfg = LedgerConfig::default();
        let cfg2 = cfg.clone();
        let debug = format!("{cfg2:?}");
        assert!(debug.contains("LedgerConfig"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: LedgerConfig =
            serde_json::from_str(r#"{"default_decay_rate_bps": 9000}"#).unwrap();
        assert_eq!(cfg.default_decay_rate_bps, 9_000);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.data_dir.ends_with("ember"));
    }
}
