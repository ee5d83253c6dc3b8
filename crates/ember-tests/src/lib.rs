//! Cross-crate integration tests for the Ember ledger.
//!
//! Drives the public surfaces — the ledger state machine over in-memory
//! storage and the durable service over RocksDB — through the operational
//! sequences they are built for: award/decay/rate-change timelines,
//! authorization failures, and restart survival.

pub mod helpers;
