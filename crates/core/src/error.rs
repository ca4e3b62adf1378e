//! Conversion of component errors into the boundary [`AppError`].
//!
//! Not-found (including records of another company) maps to
//! `AppError::NotFound`. An imbalance raised by postings the reconcilers
//! generated themselves is a defect and maps to `AppError::Internal`; the
//! same error on caller-supplied postings is a validation failure.

use stockbook_shared::AppError;

use crate::inventory::InventoryError;
use crate::ledger::LedgerError;
use crate::reconcile::ReconcileError;
use crate::store::StoreError;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } | StoreError::CompanyNotRegistered(_) => {
                Self::NotFound(err.to_string())
            }
            StoreError::CompanyAlreadyRegistered(_) => Self::Conflict(err.to_string()),
            StoreError::Backend(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Store(e) => e.into(),
            LedgerError::AccountTypeChangeNotAllowed(_) => Self::BusinessRule(err.to_string()),
            LedgerError::EmptyEntry
            | LedgerError::UnbalancedEntry { .. }
            | LedgerError::UnknownAccountType(_)
            | LedgerError::AccountInactive(_) => Self::Validation(err.to_string()),
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Store(e) => e.into(),
            InventoryError::InvalidQuantity(_)
            | InventoryError::InvalidUnitCost(_)
            | InventoryError::ProductAccountMissing(_) => Self::Validation(err.to_string()),
            InventoryError::InsufficientStock { .. }
            | InventoryError::LotOverConsumed { .. }
            | InventoryError::ProductRetired(_) => Self::BusinessRule(err.to_string()),
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        if err.is_balance_error() {
            return Self::Internal(err.to_string());
        }
        match err {
            ReconcileError::Ledger(e) => e.into(),
            ReconcileError::Inventory(e) => e.into(),
            ReconcileError::Store(e) => e.into(),
            ReconcileError::LotInUse { .. } => Self::Conflict(err.to_string()),
            ReconcileError::MissingAccount { .. }
            | ReconcileError::NoItems
            | ReconcileError::DuplicateItem(_) => Self::Validation(err.to_string()),
        }
    }
}
