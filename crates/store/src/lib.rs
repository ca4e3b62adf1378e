//! In-memory persistence for Stockbook.
//!
//! [`MemoryStore`] implements the company-scoped store contracts of
//! `stockbook_core::store` with snapshot reads and per-company serialized
//! write transactions.

mod memory;
mod state;

pub use memory::{MemorySnapshot, MemoryStore, MemoryTx};
