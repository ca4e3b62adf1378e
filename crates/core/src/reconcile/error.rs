//! Reconciliation error types.

use rust_decimal::Decimal;
use stockbook_shared::types::{SaleItemId, StockLotId};
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::ledger::{AccountRole, LedgerError};
use crate::store::StoreError;

/// Errors raised while reconciling a purchase or sale into the ledger and
/// the inventory.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A document or product lacks an account its posting needs.
    #[error("{document} has no {role} account")]
    MissingAccount {
        /// `"purchase"`, `"sale"` or `"product"`.
        document: &'static str,
        /// The missing account's role.
        role: AccountRole,
    },

    /// A purchase's lot has already been drawn from.
    #[error("Lot {lot_id} is in use: {consumed} already consumed")]
    LotInUse {
        /// The lot.
        lot_id: StockLotId,
        /// Quantity drawn from it.
        consumed: Decimal,
    },

    /// A sale must have at least one item.
    #[error("Sale must have at least one item")]
    NoItems,

    /// The same item appears twice in one sale.
    #[error("Sale item {0} listed more than once")]
    DuplicateItem(SaleItemId),

    /// Ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Inventory error.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReconcileError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::LotInUse { .. } => "LOT_IN_USE",
            Self::NoItems => "NO_ITEMS",
            Self::DuplicateItem(_) => "DUPLICATE_ITEM",
            Self::Ledger(e) => e.error_code(),
            Self::Inventory(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingAccount { .. } | Self::NoItems | Self::DuplicateItem(_) => 400,
            Self::LotInUse { .. } => 409,
            Self::Ledger(e) => e.http_status_code(),
            Self::Inventory(e) => e.http_status_code(),
            Self::Store(e) => e.http_status_code(),
        }
    }

    /// Returns true when generated postings failed the balance check.
    #[must_use]
    pub fn is_balance_error(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_balance_error())
    }

    /// Returns true when a referenced record does not exist in the company.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Ledger(LedgerError::Store(e))
            | Self::Inventory(InventoryError::Store(e))
            | Self::Store(e) => e.is_not_found(),
            _ => false,
        }
    }
}
