//! Sale reconciliation: FIFO/LIFO stock draws and per-item entries.

pub mod service;
pub mod types;

pub use service::SaleReconciler;
pub use types::{Sale, SaleInput, SaleItem, SaleItemInput};
