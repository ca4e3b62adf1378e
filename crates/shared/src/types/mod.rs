//! Common types used across the application.

pub mod costing;
pub mod id;

pub use costing::CostingMethod;
pub use id::*;
