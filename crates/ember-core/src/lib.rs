//! # ember-core
//! Foundation types and traits for the Ember energy-credit ledger.

pub mod constants;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;
