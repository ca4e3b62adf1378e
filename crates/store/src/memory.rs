//! In-memory [`Store`] implementation.
//!
//! Each company keeps its last committed state behind an `Arc`. A write
//! transaction works on a private copy and publishes it on commit with a
//! single pointer swap; a snapshot just clones the `Arc`, so readers never
//! wait for a writer. Writers of the same company are serialized by a gate
//! held for the whole life of the transaction.
//!
//! `begin` copies the company's whole state, so the cost of every write grows
//! with the size of its books. The store is meant for tests, demos and small
//! books; large ledgers need a backend with row-level writes.

use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use stockbook_core::Company;
use stockbook_core::inventory::{ConsumptionSource, Product, StockConsumption, StockLot};
use stockbook_core::ledger::{Account, Entry, Transaction};
use stockbook_core::purchase::Purchase;
use stockbook_core::sale::Sale;
use stockbook_core::store::{Store, StoreError, StoreRead, StoreTx};
use stockbook_shared::types::{
    AccountId, CompanyId, EntryId, ProductId, PurchaseId, SaleId, StockConsumptionId, StockLotId,
};
use tracing::{debug, trace};

use crate::state::CompanyState;

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("company lock poisoned".to_string())
}

/// Admits one write transaction per company at a time.
#[derive(Debug, Default)]
struct WriterGate {
    busy: Mutex<bool>,
    released: Condvar,
}

impl WriterGate {
    fn acquire(&self) -> Result<(), StoreError> {
        let mut busy = self.busy.lock().map_err(poisoned)?;
        while *busy {
            busy = self.released.wait(busy).map_err(poisoned)?;
        }
        *busy = true;
        Ok(())
    }

    fn release(&self) {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = false;
        drop(busy);
        self.released.notify_one();
    }
}

#[derive(Debug)]
struct CompanyBook {
    company: Company,
    committed: RwLock<Arc<CompanyState>>,
    writer: WriterGate,
}

/// Thread-safe in-memory store holding any number of companies.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: DashMap<CompanyId, Arc<CompanyBook>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn book(&self, company_id: CompanyId) -> Result<Arc<CompanyBook>, StoreError> {
        // Clone out of the map so no shard lock is held while waiting on the gate.
        self.books
            .get(&company_id)
            .map(|book| Arc::clone(book.value()))
            .ok_or(StoreError::CompanyNotRegistered(company_id))
    }
}

impl Store for MemoryStore {
    type Tx = MemoryTx;
    type Snapshot = MemorySnapshot;

    fn register_company(&self, company: Company) -> Result<(), StoreError> {
        match self.books.entry(company.id) {
            MapEntry::Occupied(_) => Err(StoreError::CompanyAlreadyRegistered(company.id)),
            MapEntry::Vacant(slot) => {
                debug!(company_id = %company.id, "Company book opened");
                slot.insert(Arc::new(CompanyBook {
                    company,
                    committed: RwLock::new(Arc::new(CompanyState::default())),
                    writer: WriterGate::default(),
                }));
                Ok(())
            }
        }
    }

    fn begin(&self, company_id: CompanyId) -> Result<MemoryTx, StoreError> {
        let book = self.book(company_id)?;
        trace!(company_id = %company_id, "Waiting for writer gate");
        book.writer.acquire()?;

        let working = match book.committed.read() {
            Ok(committed) => CompanyState::clone(&committed),
            Err(err) => {
                book.writer.release();
                return Err(poisoned(err));
            }
        };
        Ok(MemoryTx { book, working })
    }

    fn snapshot(&self, company_id: CompanyId) -> Result<MemorySnapshot, StoreError> {
        let book = self.book(company_id)?;
        let state = Arc::clone(&*book.committed.read().map_err(poisoned)?);
        Ok(MemorySnapshot { book, state })
    }
}

/// Read-only view of a company's last committed state.
#[derive(Debug)]
pub struct MemorySnapshot {
    book: Arc<CompanyBook>,
    state: Arc<CompanyState>,
}

/// Write transaction over a private copy of a company's state.
///
/// Dropping it without [`commit`](StoreTx::commit) discards the copy.
#[derive(Debug)]
pub struct MemoryTx {
    book: Arc<CompanyBook>,
    working: CompanyState,
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        self.book.writer.release();
    }
}

macro_rules! impl_store_read {
    ($ty:ty, $state:ident) => {
        impl StoreRead for $ty {
            fn company(&self) -> &Company {
                &self.book.company
            }

            fn account(&self, id: AccountId) -> Result<Account, StoreError> {
                self.$state.account(id)
            }

            fn accounts(&self) -> Result<Vec<Account>, StoreError> {
                Ok(self.$state.accounts())
            }

            fn entry(&self, id: EntryId) -> Result<Entry, StoreError> {
                self.$state.entry(id)
            }

            fn entries(&self) -> Result<Vec<Entry>, StoreError> {
                Ok(self.$state.entries())
            }

            fn account_transactions(&self, id: AccountId) -> Result<Vec<Transaction>, StoreError> {
                Ok(self.$state.account_transactions(id))
            }

            fn product(&self, id: ProductId) -> Result<Product, StoreError> {
                self.$state.product(id)
            }

            fn products(&self) -> Result<Vec<Product>, StoreError> {
                Ok(self.$state.products())
            }

            fn stock_lot(&self, id: StockLotId) -> Result<StockLot, StoreError> {
                self.$state.stock_lot(id)
            }

            fn product_lots(&self, product_id: ProductId) -> Result<Vec<StockLot>, StoreError> {
                Ok(self.$state.product_lots(product_id))
            }

            fn lot_consumptions(
                &self,
                lot_id: StockLotId,
            ) -> Result<Vec<StockConsumption>, StoreError> {
                Ok(self.$state.lot_consumptions(lot_id))
            }

            fn source_consumptions(
                &self,
                source: ConsumptionSource,
            ) -> Result<Vec<StockConsumption>, StoreError> {
                Ok(self.$state.source_consumptions(source))
            }

            fn purchase(&self, id: PurchaseId) -> Result<Purchase, StoreError> {
                self.$state.purchase(id)
            }

            fn sale(&self, id: SaleId) -> Result<Sale, StoreError> {
                self.$state.sale(id)
            }
        }
    };
}

impl_store_read!(MemorySnapshot, state);
impl_store_read!(MemoryTx, working);

impl StoreTx for MemoryTx {
    fn next_lot_sequence(&mut self) -> Result<u64, StoreError> {
        Ok(self.working.next_lot_sequence())
    }

    fn save_account(&mut self, account: &Account) -> Result<(), StoreError> {
        self.working.save_account(&self.book.company, account)
    }

    fn save_product(&mut self, product: &Product) -> Result<(), StoreError> {
        self.working.save_product(&self.book.company, product)
    }

    fn save_entry(&mut self, entry: &Entry) -> Result<(), StoreError> {
        self.working.save_entry(&self.book.company, entry)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<(), StoreError> {
        self.working.delete_entry(id)
    }

    fn save_stock_lot(&mut self, lot: &StockLot) -> Result<(), StoreError> {
        self.working.save_stock_lot(&self.book.company, lot)
    }

    fn delete_stock_lot(&mut self, id: StockLotId) -> Result<(), StoreError> {
        self.working.delete_stock_lot(id)
    }

    fn save_consumption(&mut self, consumption: &StockConsumption) -> Result<(), StoreError> {
        self.working.save_consumption(consumption)
    }

    fn delete_consumption(&mut self, id: StockConsumptionId) -> Result<(), StoreError> {
        self.working.delete_consumption(id)
    }

    fn save_purchase(&mut self, purchase: &Purchase) -> Result<(), StoreError> {
        self.working.save_purchase(&self.book.company, purchase)
    }

    fn delete_purchase(&mut self, id: PurchaseId) -> Result<(), StoreError> {
        self.working.delete_purchase(id)
    }

    fn save_sale(&mut self, sale: &Sale) -> Result<(), StoreError> {
        self.working.save_sale(&self.book.company, sale)
    }

    fn delete_sale(&mut self, id: SaleId) -> Result<(), StoreError> {
        self.working.delete_sale(id)
    }

    fn commit(mut self) -> Result<(), StoreError> {
        let state = Arc::new(std::mem::take(&mut self.working));
        *self.book.committed.write().map_err(poisoned)? = state;
        debug!(company_id = %self.book.company.id, "Transaction committed");
        Ok(())
    }

    fn rollback(self) {
        debug!(company_id = %self.book.company.id, "Transaction rolled back");
    }
}
