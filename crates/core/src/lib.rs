//! Core business logic for Stockbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the traits in [`store`].
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping logic
//! - `inventory` - Stock lots and FIFO/LIFO costing
//! - `purchase` - Purchase reconciliation
//! - `sale` - Sale reconciliation
//! - `reconcile` - Settlement and errors shared by the reconcilers
//! - `store` - Persistence and tenant-context contracts
//! - `bookkeeper` - Transactional command façade

pub mod bookkeeper;
pub mod company;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod purchase;
pub mod reconcile;
pub mod sale;
pub mod store;

pub use bookkeeper::Bookkeeper;
pub use company::Company;
