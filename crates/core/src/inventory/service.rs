//! Inventory service: products, lots and the consumption ledger.
//!
//! Lot quantities are never decremented. What has been drawn from a lot is
//! the sum of its [`StockConsumption`] records, so unwinding a draw is a
//! delete of those records.

use rust_decimal::Decimal;
use stockbook_shared::types::{
    CostingMethod, ProductId, PurchaseId, StockConsumptionId, StockLotId,
};
use tracing::debug;

use super::costing::plan_consumption;
use super::error::InventoryError;
use super::types::{
    Consumption, ConsumptionSource, LotPosition, NewProduct, Product, StockConsumption, StockLot,
};
use crate::store::{StoreRead, StoreTx};

/// Stateless inventory service.
pub struct InventoryService;

impl InventoryService {
    /// Registers a product after checking its account references.
    ///
    /// # Errors
    ///
    /// Returns `ProductAccountMissing` when a purchasable product lacks its
    /// revenue or cost-of-sale account, and `NotFound` for accounts outside
    /// the company.
    pub fn register_product<T: StoreTx>(
        tx: &mut T,
        input: NewProduct,
    ) -> Result<Product, InventoryError> {
        input.validate()?;

        tx.account(input.inventory_account)?;
        for account_id in [input.revenue_account, input.cost_of_sale_account]
            .into_iter()
            .flatten()
        {
            tx.account(account_id)?;
        }

        let product = Product {
            id: ProductId::new(),
            company_id: tx.company().id,
            name: input.name,
            purchasable: input.purchasable,
            revenue_account: input.revenue_account,
            cost_of_sale_account: input.cost_of_sale_account,
            inventory_account: input.inventory_account,
            is_active: true,
        };
        tx.save_product(&product)?;

        debug!(product_id = %product.id, "Product registered");
        Ok(product)
    }

    /// Retires a product. Existing lots can still be sold.
    pub fn retire_product<T: StoreTx>(
        tx: &mut T,
        id: ProductId,
    ) -> Result<Product, InventoryError> {
        let mut product = tx.product(id)?;
        product.is_active = false;
        tx.save_product(&product)?;
        Ok(product)
    }

    /// Creates a new lot at the end of the company's creation sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity`, `InvalidUnitCost`, or `ProductRetired`.
    pub fn add_lot<T: StoreTx>(
        tx: &mut T,
        product_id: ProductId,
        purchase_id: PurchaseId,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<StockLot, InventoryError> {
        Self::check_quantity(quantity)?;
        Self::check_unit_cost(unit_cost)?;

        let product = tx.product(product_id)?;
        if !product.is_active {
            return Err(InventoryError::ProductRetired(product_id));
        }

        let lot = StockLot {
            id: StockLotId::new(),
            company_id: tx.company().id,
            product_id,
            purchase_id,
            sequence: tx.next_lot_sequence()?,
            quantity,
            unit_cost,
        };
        tx.save_stock_lot(&lot)?;

        debug!(lot_id = %lot.id, product_id = %product_id, %quantity, %unit_cost, "Lot added");
        Ok(lot)
    }

    /// Changes a lot's quantity and unit cost in place.
    ///
    /// # Errors
    ///
    /// Returns `LotOverConsumed` when the new quantity is below what has
    /// already been drawn from the lot.
    pub fn update_lot<T: StoreTx>(
        tx: &mut T,
        lot_id: StockLotId,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<StockLot, InventoryError> {
        Self::check_quantity(quantity)?;
        Self::check_unit_cost(unit_cost)?;

        let mut lot = tx.stock_lot(lot_id)?;
        let consumed = Self::lot_consumed(&*tx, lot_id)?;
        if quantity < consumed {
            return Err(InventoryError::LotOverConsumed {
                lot_id,
                consumed,
                quantity,
            });
        }

        lot.quantity = quantity;
        lot.unit_cost = unit_cost;
        tx.save_stock_lot(&lot)?;
        Ok(lot)
    }

    /// Moves an untouched lot to another product.
    ///
    /// The caller checks that nothing has been drawn from the lot.
    pub fn move_lot<T: StoreTx>(
        tx: &mut T,
        lot_id: StockLotId,
        product_id: ProductId,
    ) -> Result<StockLot, InventoryError> {
        let product = tx.product(product_id)?;
        if !product.is_active {
            return Err(InventoryError::ProductRetired(product_id));
        }

        let mut lot = tx.stock_lot(lot_id)?;
        lot.product_id = product_id;
        tx.save_stock_lot(&lot)?;
        Ok(lot)
    }

    /// Deletes a lot together with its consumption records.
    pub fn remove_lot<T: StoreTx>(tx: &mut T, lot_id: StockLotId) -> Result<(), InventoryError> {
        tx.delete_stock_lot(lot_id)?;
        debug!(lot_id = %lot_id, "Lot removed");
        Ok(())
    }

    /// The product's lots with the quantity drawn from each, in creation order.
    pub fn lot_positions<R: StoreRead + ?Sized>(
        reader: &R,
        product_id: ProductId,
    ) -> Result<Vec<LotPosition>, InventoryError> {
        reader
            .product_lots(product_id)?
            .into_iter()
            .map(|lot| {
                let records = reader.lot_consumptions(lot.id)?;
                Ok(LotPosition::new(lot, &records))
            })
            .collect()
    }

    /// Quantity already drawn from a lot.
    pub fn lot_consumed<R: StoreRead + ?Sized>(
        reader: &R,
        lot_id: StockLotId,
    ) -> Result<Decimal, InventoryError> {
        Ok(reader
            .lot_consumptions(lot_id)?
            .iter()
            .map(|c| c.quantity)
            .sum())
    }

    /// Draws `quantity` units of a product across its lots.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` before writing anything if the lots
    /// cannot cover the request.
    pub fn consume<T: StoreTx>(
        tx: &mut T,
        product_id: ProductId,
        quantity: Decimal,
        method: CostingMethod,
        source: ConsumptionSource,
    ) -> Result<Consumption, InventoryError> {
        tx.product(product_id)?;
        let positions = Self::lot_positions(&*tx, product_id)?;
        let plan = plan_consumption(product_id, &positions, quantity, method)?;

        let mut consumptions = Vec::with_capacity(plan.draws.len());
        for draw in &plan.draws {
            let record = StockConsumption {
                id: StockConsumptionId::new(),
                lot_id: draw.lot_id,
                source,
                quantity: draw.quantity,
            };
            tx.save_consumption(&record)?;
            consumptions.push(record);
        }

        debug!(
            product_id = %product_id,
            %quantity,
            %method,
            lots = consumptions.len(),
            total_cost = %plan.total_cost,
            "Stock consumed"
        );
        Ok(Consumption {
            consumptions,
            total_cost: plan.total_cost,
        })
    }

    /// Draws `quantity` units from one specific lot.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` if the lot has less than `quantity` left.
    pub fn consume_lot<T: StoreTx>(
        tx: &mut T,
        lot_id: StockLotId,
        quantity: Decimal,
        source: ConsumptionSource,
    ) -> Result<Consumption, InventoryError> {
        Self::check_quantity(quantity)?;

        let lot = tx.stock_lot(lot_id)?;
        let records = tx.lot_consumptions(lot_id)?;
        let position = LotPosition::new(lot, &records);
        let available = position.remaining_qty();
        if available < quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: position.lot.product_id,
                requested: quantity,
                available,
            });
        }

        let record = StockConsumption {
            id: StockConsumptionId::new(),
            lot_id,
            source,
            quantity,
        };
        tx.save_consumption(&record)?;

        Ok(Consumption {
            total_cost: quantity * position.lot.unit_cost,
            consumptions: vec![record],
        })
    }

    /// Deletes consumption records, restoring the lots' remaining quantity.
    pub fn unconsume<T: StoreTx>(
        tx: &mut T,
        consumptions: &[StockConsumption],
    ) -> Result<(), InventoryError> {
        for record in consumptions {
            tx.delete_consumption(record.id)?;
        }
        Ok(())
    }

    /// Deletes every consumption record produced by a source.
    pub fn unconsume_source<T: StoreTx>(
        tx: &mut T,
        source: ConsumptionSource,
    ) -> Result<Vec<StockConsumption>, InventoryError> {
        let records = tx.source_consumptions(source)?;
        Self::unconsume(tx, &records)?;
        Ok(records)
    }

    /// Σ remaining quantity over the product's lots.
    pub fn current_inventory<R: StoreRead + ?Sized>(
        reader: &R,
        product_id: ProductId,
    ) -> Result<Decimal, InventoryError> {
        reader.product(product_id)?;
        Ok(Self::lot_positions(reader, product_id)?
            .iter()
            .map(LotPosition::remaining_qty)
            .sum())
    }

    /// Σ remaining quantity × unit cost over the product's lots.
    pub fn inventory_value<R: StoreRead + ?Sized>(
        reader: &R,
        product_id: ProductId,
    ) -> Result<Decimal, InventoryError> {
        reader.product(product_id)?;
        Ok(Self::lot_positions(reader, product_id)?
            .iter()
            .map(LotPosition::remaining_value)
            .sum())
    }

    fn check_quantity(quantity: Decimal) -> Result<(), InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        Ok(())
    }

    fn check_unit_cost(unit_cost: Decimal) -> Result<(), InventoryError> {
        if unit_cost < Decimal::ZERO {
            return Err(InventoryError::InvalidUnitCost(unit_cost));
        }
        Ok(())
    }
}
