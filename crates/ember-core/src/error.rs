//! Error types for the Ember ledger.
use thiserror::Error;

use crate::types::{AccountId, CreditClass};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("credit class index {0} out of range")] InvalidCreditClass(u8),
    #[error("award amount must be greater than zero")] InvalidAmount,
    #[error("decay rate {got} out of range: maximum {max} basis points")] InvalidRate { got: u64, max: u64 },
    #[error("caller {0} is not the ledger administrator")] NotAdmin(AccountId),
    #[error("raw balance overflow for {account} in class {class}")] BalanceOverflow { account: AccountId, class: CreditClass },
    #[error(transparent)] Store(#[from] StoreError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend: {0}")] Backend(String),
    #[error("corrupt {entity} record: {detail}")] Corrupt { entity: &'static str, detail: String },
}
