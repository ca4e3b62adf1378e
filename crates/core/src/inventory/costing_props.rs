//! Property-based tests for consumption planning.

use proptest::prelude::*;
use rust_decimal::Decimal;
use stockbook_shared::types::{CompanyId, CostingMethod, ProductId, PurchaseId, StockLotId};

use super::costing::plan_consumption;
use super::error::InventoryError;
use super::types::{LotPosition, StockLot};

/// Strategy for one lot: (quantity, unit cost in cents, consumed share in %).
fn lot_strategy() -> impl Strategy<Value = (i64, i64, i64)> {
    (1i64..500, 0i64..100_000, 0i64..=100)
}

fn positions_strategy() -> impl Strategy<Value = Vec<LotPosition>> {
    prop::collection::vec(lot_strategy(), 1..8).prop_map(|lots| {
        lots.into_iter()
            .enumerate()
            .map(|(i, (quantity, cents, share))| {
                let quantity = Decimal::from(quantity);
                LotPosition {
                    lot: StockLot {
                        id: StockLotId::new(),
                        company_id: CompanyId::new(),
                        product_id: ProductId::new(),
                        purchase_id: PurchaseId::new(),
                        sequence: i as u64 + 1,
                        quantity,
                        unit_cost: Decimal::new(cents, 2),
                    },
                    consumed: (quantity * Decimal::from(share) / Decimal::from(100)).floor(),
                }
            })
            .collect()
    })
}

fn method_strategy() -> impl Strategy<Value = CostingMethod> {
    prop_oneof![Just(CostingMethod::Fifo), Just(CostingMethod::Lifo)]
}

fn available(positions: &[LotPosition]) -> Decimal {
    positions.iter().map(LotPosition::remaining_qty).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A satisfiable request draws exactly the requested quantity, never more
    /// than any lot has left, and costs Σ draw quantity × unit cost.
    #[test]
    fn prop_plan_draws_exactly_requested(
        positions in positions_strategy(),
        method in method_strategy(),
        pick in 1i64..10_000,
    ) {
        let total = available(&positions);
        prop_assume!(total > Decimal::ZERO);
        let requested = Decimal::from(pick).min(total);

        let plan = plan_consumption(ProductId::new(), &positions, requested, method).unwrap();

        let drawn: Decimal = plan.draws.iter().map(|d| d.quantity).sum();
        prop_assert_eq!(drawn, requested);

        for draw in &plan.draws {
            let position = positions.iter().find(|p| p.lot.id == draw.lot_id).unwrap();
            prop_assert!(draw.quantity > Decimal::ZERO);
            prop_assert!(draw.quantity <= position.remaining_qty());
        }

        let cost: Decimal = plan.draws.iter().map(|d| d.quantity * d.unit_cost).sum();
        prop_assert_eq!(cost, plan.total_cost);
    }

    /// Only the last lot touched may be partially drawn.
    #[test]
    fn prop_plan_exhausts_lots_in_order(
        positions in positions_strategy(),
        method in method_strategy(),
        pick in 1i64..10_000,
    ) {
        let total = available(&positions);
        prop_assume!(total > Decimal::ZERO);
        let requested = Decimal::from(pick).min(total);

        let plan = plan_consumption(ProductId::new(), &positions, requested, method).unwrap();

        let sequences: Vec<u64> = plan
            .draws
            .iter()
            .map(|d| positions.iter().find(|p| p.lot.id == d.lot_id).unwrap().lot.sequence)
            .collect();
        let mut sorted = sequences.clone();
        sorted.sort_unstable();
        if method == CostingMethod::Lifo {
            sorted.reverse();
        }
        prop_assert_eq!(&sequences, &sorted);

        for draw in plan.draws.iter().take(plan.draws.len().saturating_sub(1)) {
            let position = positions.iter().find(|p| p.lot.id == draw.lot_id).unwrap();
            prop_assert_eq!(draw.quantity, position.remaining_qty());
        }
    }

    /// Requests beyond availability always fail and report availability.
    #[test]
    fn prop_shortfall_rejected(
        positions in positions_strategy(),
        method in method_strategy(),
        extra in 1i64..1_000,
    ) {
        let total = available(&positions);
        let requested = total + Decimal::from(extra);

        match plan_consumption(ProductId::new(), &positions, requested, method) {
            Err(InventoryError::InsufficientStock { available, .. }) => {
                prop_assert_eq!(available, total);
            }
            other => prop_assert!(false, "expected InsufficientStock, got {:?}", other),
        }
    }
}
