//! # ember-service — Durable ledger composition.
//!
//! Composes the Ember subsystems into an embeddable service:
//! - [`storage::RocksLedgerStore`] — persistent ledger state backed by RocksDB
//! - [`service::LedgerService`] — thread-safe facade over the ledger state machine
//! - [`config::LedgerConfig`] — service configuration

pub mod config;
pub mod service;
pub mod storage;

pub use config::LedgerConfig;
pub use service::LedgerService;
pub use storage::RocksLedgerStore;
