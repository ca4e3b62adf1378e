//! Purchase reconciliation: stock lots and payment/payable entries.

pub mod service;
pub mod types;

pub use service::PurchaseReconciler;
pub use types::{Purchase, PurchaseCorrection, PurchaseInput};
