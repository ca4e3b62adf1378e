//! Inventory domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockbook_shared::types::{
    AccountId, CompanyId, ProductId, PurchaseId, SaleItemId, StockConsumptionId, StockLotId,
};

use super::error::InventoryError;
use crate::ledger::AccountRole;

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Whether the product is traded (purchased and resold).
    pub purchasable: bool,
    /// Income account credited when the product is sold.
    pub revenue_account: Option<AccountId>,
    /// Expense account debited with the cost of goods sold.
    pub cost_of_sale_account: Option<AccountId>,
    /// Asset account carrying the value of stock on hand.
    pub inventory_account: AccountId,
    /// Retired products keep their lots but accept no new purchases.
    pub is_active: bool,
}

impl Product {
    /// Returns the revenue account or the role that is missing.
    pub fn require_revenue_account(&self) -> Result<AccountId, AccountRole> {
        self.revenue_account.ok_or(AccountRole::Revenue)
    }

    /// Returns the cost-of-sale account or the role that is missing.
    pub fn require_cost_of_sale_account(&self) -> Result<AccountId, AccountRole> {
        self.cost_of_sale_account.ok_or(AccountRole::CostOfSale)
    }
}

/// Input for registering a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Whether the product is traded.
    pub purchasable: bool,
    /// Revenue account (required when purchasable).
    pub revenue_account: Option<AccountId>,
    /// Cost-of-sale account (required when purchasable).
    pub cost_of_sale_account: Option<AccountId>,
    /// Inventory account.
    pub inventory_account: AccountId,
}

impl NewProduct {
    /// Checks that the account references required by the purchasable flag
    /// are present.
    ///
    /// # Errors
    ///
    /// Returns `ProductAccountMissing` naming the first absent role.
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.purchasable {
            if self.revenue_account.is_none() {
                return Err(InventoryError::ProductAccountMissing(AccountRole::Revenue));
            }
            if self.cost_of_sale_account.is_none() {
                return Err(InventoryError::ProductAccountMissing(AccountRole::CostOfSale));
            }
        }
        Ok(())
    }
}

/// One inbound batch of a product at a fixed unit cost.
///
/// The quantity is never decremented by consumption; consumption is recorded
/// separately in [`StockConsumption`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLot {
    /// Unique identifier.
    pub id: StockLotId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The product stocked.
    pub product_id: ProductId,
    /// The purchase that created the lot.
    pub purchase_id: PurchaseId,
    /// Creation order inside the company; drives FIFO/LIFO.
    pub sequence: u64,
    /// Quantity received.
    pub quantity: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

/// What drew quantity from a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConsumptionSource {
    /// A sale line.
    SaleItem(SaleItemId),
    /// A write-off recorded against a purchase's own lot.
    PurchaseCorrection(PurchaseId),
}

/// Append-only record of quantity drawn from a lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockConsumption {
    /// Unique identifier.
    pub id: StockConsumptionId,
    /// The lot drawn from.
    pub lot_id: StockLotId,
    /// What drew the quantity.
    pub source: ConsumptionSource,
    /// Quantity drawn.
    pub quantity: Decimal,
}

/// A lot together with the quantity already drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotPosition {
    /// The lot.
    pub lot: StockLot,
    /// Sum of the lot's consumption records.
    pub consumed: Decimal,
}

impl LotPosition {
    /// Builds a position from a lot and its consumption records.
    #[must_use]
    pub fn new(lot: StockLot, consumptions: &[StockConsumption]) -> Self {
        let consumed = consumptions
            .iter()
            .filter(|c| c.lot_id == lot.id)
            .map(|c| c.quantity)
            .sum();
        Self { lot, consumed }
    }

    /// Quantity still available.
    #[must_use]
    pub fn remaining_qty(&self) -> Decimal {
        self.lot.quantity - self.consumed
    }

    /// Value of the quantity still available.
    #[must_use]
    pub fn remaining_value(&self) -> Decimal {
        self.remaining_qty() * self.lot.unit_cost
    }
}

/// Result of drawing stock for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumption {
    /// Records appended, one per lot touched.
    pub consumptions: Vec<StockConsumption>,
    /// Σ quantity × unit cost over the records.
    pub total_cost: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_lot(quantity: Decimal) -> StockLot {
        StockLot {
            id: StockLotId::new(),
            company_id: CompanyId::new(),
            product_id: ProductId::new(),
            purchase_id: PurchaseId::new(),
            sequence: 1,
            quantity,
            unit_cost: dec!(2.50),
        }
    }

    fn draw(lot: &StockLot, quantity: Decimal) -> StockConsumption {
        StockConsumption {
            id: StockConsumptionId::new(),
            lot_id: lot.id,
            source: ConsumptionSource::SaleItem(SaleItemId::new()),
            quantity,
        }
    }

    #[test]
    fn test_remaining_qty_ignores_other_lots() {
        let lot = make_lot(dec!(10));
        let other = make_lot(dec!(10));
        let records = vec![draw(&lot, dec!(3)), draw(&other, dec!(7)), draw(&lot, dec!(1))];

        let position = LotPosition::new(lot, &records);
        assert_eq!(position.consumed, dec!(4));
        assert_eq!(position.remaining_qty(), dec!(6));
        assert_eq!(position.remaining_value(), dec!(15.00));
    }

    #[test]
    fn test_purchasable_product_requires_sale_accounts() {
        let mut input = NewProduct {
            name: "Widget".into(),
            purchasable: true,
            revenue_account: None,
            cost_of_sale_account: Some(AccountId::new()),
            inventory_account: AccountId::new(),
        };
        assert!(matches!(
            input.validate(),
            Err(InventoryError::ProductAccountMissing(AccountRole::Revenue))
        ));

        input.revenue_account = Some(AccountId::new());
        input.cost_of_sale_account = None;
        assert!(matches!(
            input.validate(),
            Err(InventoryError::ProductAccountMissing(AccountRole::CostOfSale))
        ));

        input.purchasable = false;
        assert!(input.validate().is_ok());
    }
}
