//! Persistence and tenant-context contracts.
//!
//! The core never talks to a database directly. It reads and writes through
//! a company-scoped handle:
//! - [`Store::snapshot`] returns a read-only view of the last committed state
//! - [`Store::begin`] opens a write transaction; nothing it does is visible
//!   to other handles until [`StoreTx::commit`]
//!
//! Every lookup is implicitly filtered by the handle's company. A record that
//! belongs to another company is reported as [`StoreError::NotFound`].
//! Implementations must serialize write transactions of the same company so
//! that two reconciliations never consume the same stock lot concurrently.

pub mod error;

pub use error::StoreError;

use stockbook_shared::types::{
    AccountId, CompanyId, EntryId, ProductId, PurchaseId, SaleId, StockConsumptionId, StockLotId,
};

use crate::company::Company;
use crate::inventory::{ConsumptionSource, Product, StockConsumption, StockLot};
use crate::ledger::{Account, Entry, Transaction};
use crate::purchase::Purchase;
use crate::sale::Sale;

/// Company-scoped read access.
pub trait StoreRead {
    /// The company this handle is scoped to.
    fn company(&self) -> &Company;

    /// Looks up an account.
    fn account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Lists all accounts of the company.
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Looks up an entry together with its transactions.
    fn entry(&self, id: EntryId) -> Result<Entry, StoreError>;

    /// Lists all entries of the company.
    fn entries(&self) -> Result<Vec<Entry>, StoreError>;

    /// Lists every transaction posted to an account.
    fn account_transactions(&self, id: AccountId) -> Result<Vec<Transaction>, StoreError>;

    /// Looks up a product.
    fn product(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Lists all products of the company.
    fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Looks up a stock lot.
    fn stock_lot(&self, id: StockLotId) -> Result<StockLot, StoreError>;

    /// Lists a product's lots in ascending creation sequence.
    fn product_lots(&self, product_id: ProductId) -> Result<Vec<StockLot>, StoreError>;

    /// Lists the consumption records drawn from a lot.
    fn lot_consumptions(&self, lot_id: StockLotId) -> Result<Vec<StockConsumption>, StoreError>;

    /// Lists the consumption records produced by a source.
    fn source_consumptions(
        &self,
        source: ConsumptionSource,
    ) -> Result<Vec<StockConsumption>, StoreError>;

    /// Looks up a purchase.
    fn purchase(&self, id: PurchaseId) -> Result<Purchase, StoreError>;

    /// Looks up a sale.
    fn sale(&self, id: SaleId) -> Result<Sale, StoreError>;
}

/// Company-scoped write transaction.
///
/// Dropping a transaction without calling [`commit`](StoreTx::commit) rolls
/// it back.
pub trait StoreTx: StoreRead {
    /// Allocates the next lot creation sequence number for the company.
    fn next_lot_sequence(&mut self) -> Result<u64, StoreError>;

    /// Inserts or replaces an account.
    fn save_account(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Inserts or replaces a product.
    fn save_product(&mut self, product: &Product) -> Result<(), StoreError>;

    /// Inserts or replaces an entry and all of its transactions.
    fn save_entry(&mut self, entry: &Entry) -> Result<(), StoreError>;

    /// Deletes an entry; its transactions are deleted with it.
    fn delete_entry(&mut self, id: EntryId) -> Result<(), StoreError>;

    /// Inserts or replaces a stock lot.
    fn save_stock_lot(&mut self, lot: &StockLot) -> Result<(), StoreError>;

    /// Deletes a stock lot; its consumption records are deleted with it.
    fn delete_stock_lot(&mut self, id: StockLotId) -> Result<(), StoreError>;

    /// Appends a consumption record.
    fn save_consumption(&mut self, consumption: &StockConsumption) -> Result<(), StoreError>;

    /// Deletes a consumption record.
    fn delete_consumption(&mut self, id: StockConsumptionId) -> Result<(), StoreError>;

    /// Inserts or replaces a purchase.
    fn save_purchase(&mut self, purchase: &Purchase) -> Result<(), StoreError>;

    /// Deletes a purchase record.
    fn delete_purchase(&mut self, id: PurchaseId) -> Result<(), StoreError>;

    /// Inserts or replaces a sale.
    fn save_sale(&mut self, sale: &Sale) -> Result<(), StoreError>;

    /// Deletes a sale record.
    fn delete_sale(&mut self, id: SaleId) -> Result<(), StoreError>;

    /// Makes every change durable and visible at once.
    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;

    /// Discards every change.
    fn rollback(self)
    where
        Self: Sized;
}

/// Entry point to a persistence backend.
pub trait Store: Send + Sync {
    /// Write transaction handle.
    type Tx: StoreTx;
    /// Read-only snapshot handle.
    type Snapshot: StoreRead;

    /// Registers a new company.
    fn register_company(&self, company: Company) -> Result<(), StoreError>;

    /// Opens a write transaction for a company, waiting for any transaction
    /// of the same company that is still open.
    fn begin(&self, company_id: CompanyId) -> Result<Self::Tx, StoreError>;

    /// Returns the last committed state of a company.
    fn snapshot(&self, company_id: CompanyId) -> Result<Self::Snapshot, StoreError>;
}
