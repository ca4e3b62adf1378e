//! Inventory error types.

use rust_decimal::Decimal;
use stockbook_shared::types::{ProductId, StockLotId};
use thiserror::Error;

use crate::ledger::AccountRole;
use crate::store::StoreError;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Not enough stock remains across the product's lots.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The product.
        product_id: ProductId,
        /// Quantity requested.
        requested: Decimal,
        /// Quantity remaining across all lots.
        available: Decimal,
    },

    /// Quantity must be strictly positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Unit cost cannot be negative.
    #[error("Unit cost cannot be negative, got {0}")]
    InvalidUnitCost(Decimal),

    /// A lot cannot shrink below what has already been drawn from it.
    #[error("Lot {lot_id} has {consumed} consumed, cannot set quantity to {quantity}")]
    LotOverConsumed {
        /// The lot.
        lot_id: StockLotId,
        /// Quantity already drawn.
        consumed: Decimal,
        /// Requested new quantity.
        quantity: Decimal,
    },

    /// Product is retired.
    #[error("Product {0} is retired")]
    ProductRetired(ProductId),

    /// A purchasable product lacks a required account.
    #[error("Purchasable product requires a {0} account")]
    ProductAccountMissing(AccountRole),

    /// Store error (including not-found within the company).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidUnitCost(_) => "INVALID_UNIT_COST",
            Self::LotOverConsumed { .. } => "LOT_OVER_CONSUMED",
            Self::ProductRetired(_) => "PRODUCT_RETIRED",
            Self::ProductAccountMissing(_) => "PRODUCT_ACCOUNT_MISSING",
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidQuantity(_)
            | Self::InvalidUnitCost(_)
            | Self::ProductAccountMissing(_) => 400,
            Self::InsufficientStock { .. }
            | Self::LotOverConsumed { .. }
            | Self::ProductRetired(_) => 422,
            Self::Store(e) => e.http_status_code(),
        }
    }
}
