//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use stockbook_shared::types::AccountId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry has no transactions.
    #[error("Entry must have at least one transaction")]
    EmptyEntry,

    /// Entry is not balanced (debit side != credit side).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}, Difference: {difference}")]
    UnbalancedEntry {
        /// Sum of values on debit-normal accounts.
        debit: Decimal,
        /// Sum of values on credit-normal accounts.
        credit: Decimal,
        /// Debit minus credit.
        difference: Decimal,
    },

    /// Account type string is not one of the known types.
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    // ========== Account Errors ==========
    /// Account is retired and cannot receive postings.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account type cannot be changed because it has postings.
    #[error("Cannot change account type for account {0} because it has postings")]
    AccountTypeChangeNotAllowed(AccountId),

    // ========== Storage Errors ==========
    /// Store error (including not-found within the company).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::UnknownAccountType(_) => "UNKNOWN_ACCOUNT_TYPE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountTypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyEntry
            | Self::UnbalancedEntry { .. }
            | Self::UnknownAccountType(_)
            | Self::AccountInactive(_)
            | Self::AccountTypeChangeNotAllowed(_) => 400,
            Self::Store(e) => e.http_status_code(),
        }
    }

    /// Returns true if this error is a balance violation.
    #[must_use]
    pub fn is_balance_error(&self) -> bool {
        matches!(self, Self::EmptyEntry | Self::UnbalancedEntry { .. })
    }
}
