//! # ember-ledger
//!
//! The ledger state machine. [`Ledger`] owns a
//! [`LedgerStore`](ember_core::store::LedgerStore) and applies the mutation
//! rules on top of it: administrator gating, input validation, decay
//! reconciliation before every balance write, and audit-event emission.
//!
//! Reads are pure. Querying an effective balance folds elapsed decay into
//! the answer without committing anything, so two queries at the same
//! instant always agree and storage stays byte-identical.

pub mod ledger;

pub use ledger::Ledger;
