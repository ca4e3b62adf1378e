//! One company's tables.
//!
//! A company's records live in their own [`CompanyState`], so a lookup with
//! an id owned by another company misses and reports `NotFound`.

use std::collections::BTreeMap;

use stockbook_core::Company;
use stockbook_core::inventory::{ConsumptionSource, Product, StockConsumption, StockLot};
use stockbook_core::ledger::{Account, Entry, Transaction};
use stockbook_core::purchase::Purchase;
use stockbook_core::sale::Sale;
use stockbook_core::store::StoreError;
use stockbook_shared::types::{
    AccountId, CompanyId, EntryId, ProductId, PurchaseId, SaleId, StockConsumptionId, StockLotId,
};

/// All records of one company.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompanyState {
    accounts: BTreeMap<AccountId, Account>,
    entries: BTreeMap<EntryId, Entry>,
    products: BTreeMap<ProductId, Product>,
    lots: BTreeMap<StockLotId, StockLot>,
    consumptions: BTreeMap<StockConsumptionId, StockConsumption>,
    purchases: BTreeMap<PurchaseId, Purchase>,
    sales: BTreeMap<SaleId, Sale>,
    last_lot_sequence: u64,
}

fn lookup<K: Ord + std::fmt::Display, V: Clone>(
    table: &BTreeMap<K, V>,
    entity: &'static str,
    id: &K,
) -> Result<V, StoreError> {
    table
        .get(id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(entity, id))
}

/// Rejects records stamped with another company.
fn owned(
    company: &Company,
    record_company: CompanyId,
    entity: &'static str,
    id: impl std::fmt::Display,
) -> Result<(), StoreError> {
    if record_company == company.id {
        Ok(())
    } else {
        Err(StoreError::not_found(entity, id))
    }
}

impl CompanyState {
    // ========== Reads ==========

    pub(crate) fn account(&self, id: AccountId) -> Result<Account, StoreError> {
        lookup(&self.accounts, "account", &id)
    }

    pub(crate) fn accounts(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }

    pub(crate) fn entry(&self, id: EntryId) -> Result<Entry, StoreError> {
        lookup(&self.entries, "entry", &id)
    }

    pub(crate) fn entries(&self) -> Vec<Entry> {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn account_transactions(&self, id: AccountId) -> Vec<Transaction> {
        self.entries
            .values()
            .flat_map(|e| e.transactions.iter())
            .filter(|t| t.account_id == id)
            .cloned()
            .collect()
    }

    pub(crate) fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        lookup(&self.products, "product", &id)
    }

    pub(crate) fn products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub(crate) fn stock_lot(&self, id: StockLotId) -> Result<StockLot, StoreError> {
        lookup(&self.lots, "stock lot", &id)
    }

    pub(crate) fn product_lots(&self, product_id: ProductId) -> Vec<StockLot> {
        let mut lots: Vec<StockLot> = self
            .lots
            .values()
            .filter(|l| l.product_id == product_id)
            .cloned()
            .collect();
        lots.sort_by_key(|l| l.sequence);
        lots
    }

    pub(crate) fn lot_consumptions(&self, lot_id: StockLotId) -> Vec<StockConsumption> {
        self.consumptions
            .values()
            .filter(|c| c.lot_id == lot_id)
            .cloned()
            .collect()
    }

    pub(crate) fn source_consumptions(&self, source: ConsumptionSource) -> Vec<StockConsumption> {
        self.consumptions
            .values()
            .filter(|c| c.source == source)
            .cloned()
            .collect()
    }

    pub(crate) fn purchase(&self, id: PurchaseId) -> Result<Purchase, StoreError> {
        lookup(&self.purchases, "purchase", &id)
    }

    pub(crate) fn sale(&self, id: SaleId) -> Result<Sale, StoreError> {
        lookup(&self.sales, "sale", &id)
    }

    // ========== Writes ==========

    pub(crate) fn next_lot_sequence(&mut self) -> u64 {
        self.last_lot_sequence += 1;
        self.last_lot_sequence
    }

    pub(crate) fn save_account(
        &mut self,
        company: &Company,
        account: &Account,
    ) -> Result<(), StoreError> {
        owned(company, account.company_id, "account", account.id)?;
        if let Some(parent_id) = account.parent_id {
            self.account(parent_id)?;
        }
        self.accounts.insert(account.id, account.clone());
        Ok(())
    }

    pub(crate) fn save_product(
        &mut self,
        company: &Company,
        product: &Product,
    ) -> Result<(), StoreError> {
        owned(company, product.company_id, "product", product.id)?;
        self.account(product.inventory_account)?;
        self.products.insert(product.id, product.clone());
        Ok(())
    }

    /// Every transaction must post to an account of this company.
    pub(crate) fn save_entry(
        &mut self,
        company: &Company,
        entry: &Entry,
    ) -> Result<(), StoreError> {
        owned(company, entry.company_id, "entry", entry.id)?;
        for transaction in &entry.transactions {
            self.account(transaction.account_id)?;
        }
        self.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    pub(crate) fn delete_entry(&mut self, id: EntryId) -> Result<(), StoreError> {
        self.entries
            .remove(&id)
            .map(drop)
            .ok_or_else(|| StoreError::not_found("entry", id))
    }

    pub(crate) fn save_stock_lot(
        &mut self,
        company: &Company,
        lot: &StockLot,
    ) -> Result<(), StoreError> {
        owned(company, lot.company_id, "stock lot", lot.id)?;
        self.product(lot.product_id)?;
        self.lots.insert(lot.id, lot.clone());
        Ok(())
    }

    /// Consumption records of the lot go with it.
    pub(crate) fn delete_stock_lot(&mut self, id: StockLotId) -> Result<(), StoreError> {
        self.lots
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("stock lot", id))?;
        self.consumptions.retain(|_, c| c.lot_id != id);
        Ok(())
    }

    pub(crate) fn save_consumption(
        &mut self,
        consumption: &StockConsumption,
    ) -> Result<(), StoreError> {
        self.stock_lot(consumption.lot_id)?;
        self.consumptions.insert(consumption.id, consumption.clone());
        Ok(())
    }

    pub(crate) fn delete_consumption(&mut self, id: StockConsumptionId) -> Result<(), StoreError> {
        self.consumptions
            .remove(&id)
            .map(drop)
            .ok_or_else(|| StoreError::not_found("stock consumption", id))
    }

    pub(crate) fn save_purchase(
        &mut self,
        company: &Company,
        purchase: &Purchase,
    ) -> Result<(), StoreError> {
        owned(company, purchase.company_id, "purchase", purchase.id)?;
        self.purchases.insert(purchase.id, purchase.clone());
        Ok(())
    }

    pub(crate) fn delete_purchase(&mut self, id: PurchaseId) -> Result<(), StoreError> {
        self.purchases
            .remove(&id)
            .map(drop)
            .ok_or_else(|| StoreError::not_found("purchase", id))
    }

    pub(crate) fn save_sale(&mut self, company: &Company, sale: &Sale) -> Result<(), StoreError> {
        owned(company, sale.company_id, "sale", sale.id)?;
        self.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    pub(crate) fn delete_sale(&mut self, id: SaleId) -> Result<(), StoreError> {
        self.sales
            .remove(&id)
            .map(drop)
            .ok_or_else(|| StoreError::not_found("sale", id))
    }
}
