//! Inventory valuation: products, stock lots and FIFO/LIFO consumption.

pub mod costing;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod costing_props;

pub use costing::{ConsumptionPlan, LotDraw, plan_consumption};
pub use error::InventoryError;
pub use service::InventoryService;
pub use types::{
    Consumption, ConsumptionSource, LotPosition, NewProduct, Product, StockConsumption, StockLot,
};
