//! Purchase reconciliation.
//!
//! Every operation runs inside the caller's store transaction and writes the
//! purchase, its lot and its entries together.

use rust_decimal::Decimal;
use stockbook_shared::types::{AccountId, ProductId, PurchaseId, StockLotId};
use tracing::debug;

use super::types::{Purchase, PurchaseCorrection, PurchaseInput};
use crate::inventory::{ConsumptionSource, InventoryService};
use crate::ledger::{AccountRole, EntrySource, LedgerService, Posting};
use crate::reconcile::{ReconcileError, Settlement};
use crate::store::{StoreRead, StoreTx};

const DOCUMENT: &str = "purchase";

/// Stateless purchase reconciler.
pub struct PurchaseReconciler;

impl PurchaseReconciler {
    /// Records a purchase: one lot and one payment or payable entry.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` if the account the paid flag needs is absent
    /// and `NotFound` for an unknown product. Both are checked before any
    /// write.
    pub fn create<T: StoreTx>(
        tx: &mut T,
        input: PurchaseInput,
    ) -> Result<Purchase, ReconcileError> {
        let settlement = Self::settlement(&input)?;
        let product = tx.product(input.product_id)?;

        let purchase_id = PurchaseId::new();
        let lot = InventoryService::add_lot(
            tx,
            product.id,
            purchase_id,
            input.quantity,
            input.unit_price,
        )?;

        let mut purchase = Purchase {
            id: purchase_id,
            company_id: tx.company().id,
            product_id: product.id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            paid: input.paid,
            payment_account: input.payment_account,
            payable_account: input.payable_account,
            lot_id: lot.id,
            entry_id: Default::default(),
            corrections: Vec::new(),
        };

        let postings = Self::postings(product.inventory_account, settlement, purchase.price());
        let entry = LedgerService::post_entry(
            tx,
            Self::description(&purchase),
            Some(purchase.entry_source()),
            &postings,
        )?;
        purchase.entry_id = entry.id;
        tx.save_purchase(&purchase)?;

        debug!(
            purchase_id = %purchase.id,
            price = %purchase.price(),
            paid = purchase.paid,
            "Purchase created"
        );
        Ok(purchase)
    }

    /// Applies new values to a purchase, its lot and its entries.
    ///
    /// The lot is changed in place. When the paid flag flips, the old entry
    /// is deleted and a new one is posted on the other side; otherwise the
    /// active entry's postings are replaced.
    ///
    /// # Errors
    ///
    /// Returns `LotOverConsumed` when the new quantity is below what has been
    /// drawn from the lot, `LotInUse` when moving a drawn-from lot to another
    /// product, and `LotInUse` when repricing a lot that sales have drawn
    /// from, since their posted cost would no longer match the lot.
    pub fn update<T: StoreTx>(
        tx: &mut T,
        id: PurchaseId,
        input: PurchaseInput,
    ) -> Result<Purchase, ReconcileError> {
        let settlement = Self::settlement(&input)?;
        let mut purchase = tx.purchase(id)?;
        let product = tx.product(input.product_id)?;

        if product.id != purchase.product_id {
            let consumed = InventoryService::lot_consumed(&*tx, purchase.lot_id)?;
            if consumed > Decimal::ZERO {
                return Err(ReconcileError::LotInUse {
                    lot_id: purchase.lot_id,
                    consumed,
                });
            }
            InventoryService::move_lot(tx, purchase.lot_id, product.id)?;
        }
        if input.unit_price != purchase.unit_price {
            let sold = Self::sold_from_lot(&*tx, purchase.lot_id)?;
            if sold > Decimal::ZERO {
                return Err(ReconcileError::LotInUse {
                    lot_id: purchase.lot_id,
                    consumed: sold,
                });
            }
        }
        InventoryService::update_lot(tx, purchase.lot_id, input.quantity, input.unit_price)?;

        let was_paid = purchase.paid;
        purchase.product_id = product.id;
        purchase.quantity = input.quantity;
        purchase.unit_price = input.unit_price;
        purchase.paid = input.paid;
        purchase.payment_account = input.payment_account;
        purchase.payable_account = input.payable_account;

        let postings = Self::postings(product.inventory_account, settlement, purchase.price());
        if was_paid == purchase.paid {
            LedgerService::replace_postings(tx, purchase.entry_id, &postings)?;
        } else {
            LedgerService::delete_entry(tx, purchase.entry_id)?;
            let entry = LedgerService::post_entry(
                tx,
                Self::description(&purchase),
                Some(purchase.entry_source()),
                &postings,
            )?;
            purchase.entry_id = entry.id;
        }

        for correction in &purchase.corrections {
            let postings = Self::correction_postings(
                product.inventory_account,
                correction.loss_account,
                correction.quantity * purchase.unit_price,
            );
            LedgerService::replace_postings(tx, correction.entry_id, &postings)?;
        }

        tx.save_purchase(&purchase)?;
        debug!(
            purchase_id = %purchase.id,
            price = %purchase.price(),
            paid = purchase.paid,
            "Purchase updated"
        );
        Ok(purchase)
    }

    /// Deletes a purchase with its lot, corrections and entry.
    ///
    /// # Errors
    ///
    /// Returns `LotInUse` when a sale has drawn from the lot.
    pub fn delete<T: StoreTx>(tx: &mut T, id: PurchaseId) -> Result<(), ReconcileError> {
        let purchase = tx.purchase(id)?;

        let sold = Self::sold_from_lot(&*tx, purchase.lot_id)?;
        if sold > Decimal::ZERO {
            return Err(ReconcileError::LotInUse {
                lot_id: purchase.lot_id,
                consumed: sold,
            });
        }

        InventoryService::unconsume_source(tx, ConsumptionSource::PurchaseCorrection(id))?;
        for correction in &purchase.corrections {
            LedgerService::delete_entry(tx, correction.entry_id)?;
        }
        InventoryService::remove_lot(tx, purchase.lot_id)?;
        LedgerService::delete_entry(tx, purchase.entry_id)?;
        tx.delete_purchase(id)?;

        debug!(purchase_id = %id, "Purchase deleted");
        Ok(())
    }

    /// Writes off `quantity` units from the purchase's own lot.
    ///
    /// Posts inventory `-cost` against the loss account `+cost`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when the lot has less than `quantity`
    /// left.
    pub fn record_correction<T: StoreTx>(
        tx: &mut T,
        id: PurchaseId,
        quantity: Decimal,
        loss_account: AccountId,
    ) -> Result<Purchase, ReconcileError> {
        let mut purchase = tx.purchase(id)?;
        let product = tx.product(purchase.product_id)?;

        let consumption = InventoryService::consume_lot(
            tx,
            purchase.lot_id,
            quantity,
            ConsumptionSource::PurchaseCorrection(id),
        )?;
        let postings = Self::correction_postings(
            product.inventory_account,
            loss_account,
            consumption.total_cost,
        );
        let entry = LedgerService::post_entry(
            tx,
            format!("Correction of purchase {id}"),
            Some(EntrySource::PurchaseCorrection { purchase_id: id }),
            &postings,
        )?;

        purchase.corrections.push(PurchaseCorrection {
            quantity,
            loss_account,
            entry_id: entry.id,
        });
        tx.save_purchase(&purchase)?;

        debug!(
            purchase_id = %id,
            %quantity,
            cost = %consumption.total_cost,
            "Purchase correction recorded"
        );
        Ok(purchase)
    }

    /// Purchases of one product, oldest lot first.
    pub fn product_purchases<R: StoreRead + ?Sized>(
        reader: &R,
        product_id: ProductId,
    ) -> Result<Vec<Purchase>, ReconcileError> {
        reader
            .product_lots(product_id)?
            .into_iter()
            .map(|lot| Ok(reader.purchase(lot.purchase_id)?))
            .collect()
    }

    /// Quantity sales have drawn from a lot, ignoring corrections.
    fn sold_from_lot<R: StoreRead + ?Sized>(
        reader: &R,
        lot_id: StockLotId,
    ) -> Result<Decimal, ReconcileError> {
        Ok(reader
            .lot_consumptions(lot_id)?
            .iter()
            .filter(|c| matches!(c.source, ConsumptionSource::SaleItem(_)))
            .map(|c| c.quantity)
            .sum())
    }

    fn settlement(input: &PurchaseInput) -> Result<Settlement, ReconcileError> {
        Settlement::resolve(
            DOCUMENT,
            input.paid,
            input.payment_account,
            input.payable_account,
            AccountRole::Payable,
        )
    }

    fn postings(
        inventory_account: AccountId,
        settlement: Settlement,
        price: Decimal,
    ) -> [Posting; 2] {
        let settled = match settlement {
            Settlement::Paid(account_id) => Posting::new(account_id, -price),
            Settlement::OnCredit(account_id) => Posting::new(account_id, price),
        };
        [Posting::new(inventory_account, price), settled]
    }

    fn correction_postings(
        inventory_account: AccountId,
        loss_account: AccountId,
        cost: Decimal,
    ) -> [Posting; 2] {
        [
            Posting::new(inventory_account, -cost),
            Posting::new(loss_account, cost),
        ]
    }

    fn description(purchase: &Purchase) -> String {
        if purchase.paid {
            format!("Payment for purchase {}", purchase.id)
        } else {
            format!("Payable for purchase {}", purchase.id)
        }
    }
}
