//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Accounts, their types and normal sides
//! - Entries and their signed transactions
//! - The balance invariant (debit side equals credit side)
//! - Ledger service for posting, replacing and reading entries
//! - Error types for ledger operations

pub mod account;
pub mod entry;
pub mod error;
pub mod service;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountRole, AccountType, NormalSide, OpenAccountInput};
pub use entry::{Entry, EntrySource, Posting, Transaction};
pub use error::LedgerError;
pub use service::LedgerService;
pub use validation::{EntryTotals, validate_balance};
