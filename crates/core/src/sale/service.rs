//! Sale reconciliation.
//!
//! Each item draws stock with the company's costing method and posts one
//! entry:
//!
//! | account            | value   |
//! |--------------------|---------|
//! | inventory          | -cost   |
//! | cost of sale       | +cost   |
//! | revenue            | +amount |
//! | payment/receivable | +amount |

use std::collections::HashSet;

use rust_decimal::Decimal;
use stockbook_shared::types::{AccountId, CostingMethod, EntryId, SaleId, SaleItemId};
use tracing::debug;

use super::types::{Sale, SaleInput, SaleItem, SaleItemInput};
use crate::inventory::{ConsumptionSource, InventoryService, Product};
use crate::ledger::{AccountRole, EntrySource, LedgerService, Posting};
use crate::reconcile::{ReconcileError, Settlement};
use crate::store::{StoreError, StoreTx};

const DOCUMENT: &str = "sale";

/// Product accounts a sale line posts to.
struct SaleAccounts {
    inventory: AccountId,
    revenue: AccountId,
    cost_of_sale: AccountId,
}

impl SaleAccounts {
    fn postings(&self, settlement: Settlement, cost: Decimal, amount: Decimal) -> [Posting; 4] {
        [
            Posting::new(self.inventory, -cost),
            Posting::new(self.cost_of_sale, cost),
            Posting::new(self.revenue, amount),
            Posting::new(settlement.account_id(), amount),
        ]
    }
}

/// Stateless sale reconciler.
pub struct SaleReconciler;

impl SaleReconciler {
    /// Records a sale, drawing stock and posting one entry per item.
    ///
    /// # Errors
    ///
    /// Returns `NoItems` for an empty sale, `MissingAccount` when the
    /// settlement or a product account is absent, and `InsufficientStock`
    /// when any item cannot be covered. The caller's transaction must be
    /// rolled back on error.
    pub fn create<T: StoreTx>(tx: &mut T, input: SaleInput) -> Result<Sale, ReconcileError> {
        let settlement = Self::check_input(&input)?;
        let method = tx.company().costing_method;

        let sale_id = SaleId::new();
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            items.push(Self::add_item(tx, sale_id, settlement, method, line)?);
        }

        let sale = Sale {
            id: sale_id,
            company_id: tx.company().id,
            customer_id: input.customer_id,
            paid: input.paid,
            payment_account: input.payment_account,
            receivable_account: input.receivable_account,
            items,
        };
        tx.save_sale(&sale)?;

        debug!(sale_id = %sale.id, items = sale.items.len(), total = %sale.total(), "Sale created");
        Ok(sale)
    }

    /// Replaces a sale's items and settlement.
    ///
    /// A kept item with the same product and quantity keeps its draws and
    /// cost; only its revenue and settlement lines are refreshed. Every other
    /// kept item releases its draws and takes stock again. New items get a
    /// new entry; dropped items release their stock and lose their entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an item id that does not belong to the sale,
    /// plus every error of [`create`](Self::create).
    pub fn update<T: StoreTx>(
        tx: &mut T,
        id: SaleId,
        input: SaleInput,
    ) -> Result<Sale, ReconcileError> {
        let settlement = Self::check_input(&input)?;
        let mut sale = tx.sale(id)?;
        let method = tx.company().costing_method;

        for old in &sale.items {
            if !Self::keeps_draws(old, &input.items) {
                InventoryService::unconsume_source(tx, ConsumptionSource::SaleItem(old.id))?;
            }
        }

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let item = match line.id {
                None => Self::add_item(tx, sale.id, settlement, method, line)?,
                Some(item_id) => {
                    let existing = sale
                        .item(item_id)
                        .ok_or_else(|| StoreError::not_found("sale item", item_id))?;
                    if Self::same_draw(existing, line) {
                        Self::reprice_item(tx, existing, settlement, line)?
                    } else {
                        Self::redo_item(tx, existing.entry_id, item_id, settlement, method, line)?
                    }
                }
            };
            items.push(item);
        }

        for dropped in sale
            .items
            .iter()
            .filter(|old| !items.iter().any(|new| new.id == old.id))
        {
            LedgerService::delete_entry(tx, dropped.entry_id)?;
        }

        sale.customer_id = input.customer_id;
        sale.paid = input.paid;
        sale.payment_account = input.payment_account;
        sale.receivable_account = input.receivable_account;
        sale.items = items;
        tx.save_sale(&sale)?;

        debug!(sale_id = %sale.id, items = sale.items.len(), total = %sale.total(), "Sale updated");
        Ok(sale)
    }

    /// Deletes a sale, releasing its stock and deleting its entries.
    pub fn delete<T: StoreTx>(tx: &mut T, id: SaleId) -> Result<(), ReconcileError> {
        let sale = tx.sale(id)?;
        for item in &sale.items {
            InventoryService::unconsume_source(tx, ConsumptionSource::SaleItem(item.id))?;
            LedgerService::delete_entry(tx, item.entry_id)?;
        }
        tx.delete_sale(id)?;

        debug!(sale_id = %id, "Sale deleted");
        Ok(())
    }

    fn check_input(input: &SaleInput) -> Result<Settlement, ReconcileError> {
        if input.items.is_empty() {
            return Err(ReconcileError::NoItems);
        }

        let mut seen = HashSet::new();
        for item_id in input.items.iter().filter_map(|line| line.id) {
            if !seen.insert(item_id) {
                return Err(ReconcileError::DuplicateItem(item_id));
            }
        }

        Settlement::resolve(
            DOCUMENT,
            input.paid,
            input.payment_account,
            input.receivable_account,
            AccountRole::Receivable,
        )
    }

    fn add_item<T: StoreTx>(
        tx: &mut T,
        sale_id: SaleId,
        settlement: Settlement,
        method: CostingMethod,
        line: &SaleItemInput,
    ) -> Result<SaleItem, ReconcileError> {
        let item_id = SaleItemId::new();
        let (postings, cost) = Self::draw(tx, item_id, settlement, method, line)?;
        let entry = LedgerService::post_entry(
            tx,
            format!("Sale {sale_id} item {item_id}"),
            Some(EntrySource::SaleItem { sale_id, item_id }),
            &postings,
        )?;

        Ok(SaleItem {
            id: item_id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
            cost,
            entry_id: entry.id,
        })
    }

    /// Whether `old` survives the update with the stock it already drew.
    fn keeps_draws(old: &SaleItem, lines: &[SaleItemInput]) -> bool {
        lines
            .iter()
            .any(|line| line.id == Some(old.id) && Self::same_draw(old, line))
    }

    fn same_draw(item: &SaleItem, line: &SaleItemInput) -> bool {
        item.product_id == line.product_id && item.quantity == line.quantity
    }

    /// Rewrites an item's entry at its stored cost, without touching stock.
    fn reprice_item<T: StoreTx>(
        tx: &mut T,
        existing: &SaleItem,
        settlement: Settlement,
        line: &SaleItemInput,
    ) -> Result<SaleItem, ReconcileError> {
        let product = tx.product(line.product_id)?;
        let postings = Self::sale_accounts(&product)?.postings(
            settlement,
            existing.cost,
            line.quantity * line.price,
        );
        LedgerService::replace_postings(tx, existing.entry_id, &postings)?;

        Ok(SaleItem {
            price: line.price,
            ..existing.clone()
        })
    }

    fn redo_item<T: StoreTx>(
        tx: &mut T,
        entry_id: EntryId,
        item_id: SaleItemId,
        settlement: Settlement,
        method: CostingMethod,
        line: &SaleItemInput,
    ) -> Result<SaleItem, ReconcileError> {
        let (postings, cost) = Self::draw(tx, item_id, settlement, method, line)?;
        LedgerService::replace_postings(tx, entry_id, &postings)?;

        Ok(SaleItem {
            id: item_id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
            cost,
            entry_id,
        })
    }

    /// Draws the line's stock and builds its postings.
    fn draw<T: StoreTx>(
        tx: &mut T,
        item_id: SaleItemId,
        settlement: Settlement,
        method: CostingMethod,
        line: &SaleItemInput,
    ) -> Result<([Posting; 4], Decimal), ReconcileError> {
        let product = tx.product(line.product_id)?;
        let accounts = Self::sale_accounts(&product)?;

        let consumption = InventoryService::consume(
            tx,
            product.id,
            line.quantity,
            method,
            ConsumptionSource::SaleItem(item_id),
        )?;
        let cost = consumption.total_cost;
        let postings = accounts.postings(settlement, cost, line.quantity * line.price);
        Ok((postings, cost))
    }

    fn sale_accounts(product: &Product) -> Result<SaleAccounts, ReconcileError> {
        Ok(SaleAccounts {
            inventory: product.inventory_account,
            revenue: product
                .require_revenue_account()
                .map_err(Self::missing_product_account)?,
            cost_of_sale: product
                .require_cost_of_sale_account()
                .map_err(Self::missing_product_account)?,
        })
    }

    fn missing_product_account(role: AccountRole) -> ReconcileError {
        ReconcileError::MissingAccount {
            document: "product",
            role,
        }
    }
}
