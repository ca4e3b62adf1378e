//! Shared pieces of purchase and sale reconciliation.

pub mod error;
pub mod settlement;

pub use error::ReconcileError;
pub use settlement::Settlement;
