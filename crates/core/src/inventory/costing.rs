//! FIFO/LIFO consumption planning.
//!
//! Planning is pure: it decides which lots to draw from and what the draw
//! costs, without touching the store. Callers apply the plan only after it
//! succeeded, so a shortfall never leaves partial consumption behind.

use rust_decimal::Decimal;
use stockbook_shared::types::{CostingMethod, ProductId, StockLotId};

use super::error::InventoryError;
use super::types::LotPosition;

/// Quantity to draw from one lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotDraw {
    /// The lot drawn from.
    pub lot_id: StockLotId,
    /// Quantity drawn.
    pub quantity: Decimal,
    /// The lot's unit cost.
    pub unit_cost: Decimal,
}

impl LotDraw {
    /// Cost of this draw.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// Ordered draws satisfying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionPlan {
    /// Draws in costing-method order.
    pub draws: Vec<LotDraw>,
    /// Σ draw cost.
    pub total_cost: Decimal,
}

/// Plans drawing `quantity` units from `positions`.
///
/// Lots with nothing remaining are skipped. FIFO walks lots by ascending
/// creation sequence, LIFO by descending sequence.
///
/// # Errors
///
/// Returns `InvalidQuantity` for a non-positive request and
/// `InsufficientStock` when the lots cannot cover it.
pub fn plan_consumption(
    product_id: ProductId,
    positions: &[LotPosition],
    quantity: Decimal,
    method: CostingMethod,
) -> Result<ConsumptionPlan, InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(quantity));
    }

    let mut open: Vec<&LotPosition> = positions
        .iter()
        .filter(|p| p.remaining_qty() > Decimal::ZERO)
        .collect();
    open.sort_by_key(|p| p.lot.sequence);
    if method == CostingMethod::Lifo {
        open.reverse();
    }

    let available: Decimal = open.iter().map(|p| p.remaining_qty()).sum();
    if available < quantity {
        return Err(InventoryError::InsufficientStock {
            product_id,
            requested: quantity,
            available,
        });
    }

    let mut needed = quantity;
    let mut draws = Vec::new();
    for position in open {
        if needed.is_zero() {
            break;
        }
        let take = needed.min(position.remaining_qty());
        draws.push(LotDraw {
            lot_id: position.lot.id,
            quantity: take,
            unit_cost: position.lot.unit_cost,
        });
        needed -= take;
    }

    let total_cost = draws.iter().map(LotDraw::cost).sum();
    Ok(ConsumptionPlan { draws, total_cost })
}
