//! # ember-decay — Stepwise retention decay engine.
//!
//! Implements the whole-day compounding rule used by the Ember ledger:
//! - **Whole-day boundaries**: fractional elapsed days never decay.
//! - **Stepwise compounding**: `factor = factor * rate / 10_000` once per
//!   elapsed day beyond the first, truncating after every step.
//! - **Integer-only arithmetic** so results are bit-identical everywhere.

pub mod engine;
pub mod retention;

pub use engine::DecayEngine;
pub use retention::{apply_retention, compound_retention_bps};
