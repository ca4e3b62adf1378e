//! Command façade over a [`Store`].
//!
//! Each document command opens one store transaction for the company, runs
//! the reconciler inside it, and commits only if every step succeeded. Reads
//! go through a snapshot of the last committed state and never wait for a
//! writer.

use std::fmt::Display;
use std::sync::Arc;

use rust_decimal::Decimal;
use stockbook_shared::types::{
    AccountId, CompanyId, CostingMethod, EntryId, ProductId, PurchaseId, SaleId,
};
use stockbook_shared::{AppConfig, AppError, AppResult};
use tracing::{error, info, warn};

use crate::company::Company;
use crate::inventory::{InventoryService, NewProduct, Product};
use crate::ledger::{Account, AccountType, Entry, LedgerService, OpenAccountInput, Posting};
use crate::purchase::{Purchase, PurchaseInput, PurchaseReconciler};
use crate::sale::{Sale, SaleInput, SaleReconciler};
use crate::store::{Store, StoreRead, StoreTx};

/// Runs every ledger, inventory and document command against a store.
pub struct Bookkeeper<S: Store> {
    store: Arc<S>,
    default_costing_method: CostingMethod,
}

impl<S: Store> Clone for Bookkeeper<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            default_costing_method: self.default_costing_method,
        }
    }
}

impl<S: Store> Bookkeeper<S> {
    /// Creates a bookkeeper that assigns FIFO to new companies by default.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            default_costing_method: CostingMethod::default(),
        }
    }

    /// Creates a bookkeeper using the configured inventory defaults.
    #[must_use]
    pub fn from_config(store: Arc<S>, config: &AppConfig) -> Self {
        Self {
            store,
            default_costing_method: config.inventory.default_costing_method,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== Tenants ==========

    /// Registers a company. Without an explicit method the configured
    /// default applies.
    pub fn register_company(
        &self,
        name: impl Into<String>,
        costing_method: Option<CostingMethod>,
    ) -> AppResult<Company> {
        let company = Company::new(name, costing_method.unwrap_or(self.default_costing_method));
        self.store.register_company(company.clone())?;

        info!(
            company_id = %company.id,
            costing_method = %company.costing_method,
            "Company registered"
        );
        Ok(company)
    }

    // ========== Ledger ==========

    /// Opens an account.
    pub fn open_account(
        &self,
        company_id: CompanyId,
        input: OpenAccountInput,
    ) -> AppResult<Account> {
        self.in_transaction(company_id, "open_account", |tx| {
            LedgerService::open_account(tx, input)
        })
    }

    /// Retires an account.
    pub fn retire_account(&self, company_id: CompanyId, id: AccountId) -> AppResult<Account> {
        self.in_transaction(company_id, "retire_account", |tx| {
            LedgerService::retire_account(tx, id)
        })
    }

    /// Changes an account's type while it has no postings.
    pub fn change_account_type(
        &self,
        company_id: CompanyId,
        id: AccountId,
        account_type: AccountType,
    ) -> AppResult<Account> {
        self.in_transaction(company_id, "change_account_type", |tx| {
            LedgerService::change_account_type(tx, id, account_type)
        })
    }

    /// Posts a manual journal entry.
    pub fn post_entry(
        &self,
        company_id: CompanyId,
        description: impl Into<String>,
        postings: &[Posting],
    ) -> AppResult<Entry> {
        self.in_transaction(company_id, "post_entry", |tx| {
            LedgerService::post_entry(tx, description, None, postings)
        })
    }

    /// Chart of accounts.
    pub fn accounts(&self, company_id: CompanyId) -> AppResult<Vec<Account>> {
        self.read(company_id, |snapshot| snapshot.accounts())
    }

    /// Net balance of one account.
    pub fn account_balance(&self, company_id: CompanyId, id: AccountId) -> AppResult<Decimal> {
        self.read(company_id, |snapshot| LedgerService::account_balance(snapshot, id))
    }

    /// Balance of an account and all its descendants.
    pub fn rollup_balance(&self, company_id: CompanyId, id: AccountId) -> AppResult<Decimal> {
        self.read(company_id, |snapshot| LedgerService::rollup_balance(snapshot, id))
    }

    /// Looks up an entry.
    pub fn entry(&self, company_id: CompanyId, id: EntryId) -> AppResult<Entry> {
        self.read(company_id, |snapshot| snapshot.entry(id))
    }

    // ========== Inventory ==========

    /// Registers a product.
    pub fn register_product(&self, company_id: CompanyId, input: NewProduct) -> AppResult<Product> {
        self.in_transaction(company_id, "register_product", |tx| {
            InventoryService::register_product(tx, input)
        })
    }

    /// Retires a product.
    pub fn retire_product(&self, company_id: CompanyId, id: ProductId) -> AppResult<Product> {
        self.in_transaction(company_id, "retire_product", |tx| {
            InventoryService::retire_product(tx, id)
        })
    }

    /// Product catalog.
    pub fn products(&self, company_id: CompanyId) -> AppResult<Vec<Product>> {
        self.read(company_id, |snapshot| snapshot.products())
    }

    /// Quantity on hand.
    pub fn current_inventory(&self, company_id: CompanyId, id: ProductId) -> AppResult<Decimal> {
        self.read(company_id, |snapshot| InventoryService::current_inventory(snapshot, id))
    }

    /// Cost of the quantity on hand.
    pub fn inventory_value(&self, company_id: CompanyId, id: ProductId) -> AppResult<Decimal> {
        self.read(company_id, |snapshot| InventoryService::inventory_value(snapshot, id))
    }

    // ========== Purchases ==========

    /// Records a purchase.
    pub fn create_purchase(
        &self,
        company_id: CompanyId,
        input: PurchaseInput,
    ) -> AppResult<Purchase> {
        self.in_transaction(company_id, "create_purchase", |tx| {
            PurchaseReconciler::create(tx, input)
        })
    }

    /// Updates a purchase.
    pub fn update_purchase(
        &self,
        company_id: CompanyId,
        id: PurchaseId,
        input: PurchaseInput,
    ) -> AppResult<Purchase> {
        self.in_transaction(company_id, "update_purchase", |tx| {
            PurchaseReconciler::update(tx, id, input)
        })
    }

    /// Deletes a purchase.
    pub fn delete_purchase(&self, company_id: CompanyId, id: PurchaseId) -> AppResult<()> {
        self.in_transaction(company_id, "delete_purchase", |tx| {
            PurchaseReconciler::delete(tx, id)
        })
    }

    /// Writes off stock from a purchase's lot.
    pub fn record_correction(
        &self,
        company_id: CompanyId,
        id: PurchaseId,
        quantity: Decimal,
        loss_account: AccountId,
    ) -> AppResult<Purchase> {
        self.in_transaction(company_id, "record_correction", |tx| {
            PurchaseReconciler::record_correction(tx, id, quantity, loss_account)
        })
    }

    /// Looks up a purchase.
    pub fn purchase(&self, company_id: CompanyId, id: PurchaseId) -> AppResult<Purchase> {
        self.read(company_id, |snapshot| snapshot.purchase(id))
    }

    /// Purchases of one product in lot order.
    pub fn product_purchases(
        &self,
        company_id: CompanyId,
        id: ProductId,
    ) -> AppResult<Vec<Purchase>> {
        self.read(company_id, |snapshot| {
            PurchaseReconciler::product_purchases(snapshot, id)
        })
    }

    // ========== Sales ==========

    /// Records a sale.
    pub fn create_sale(&self, company_id: CompanyId, input: SaleInput) -> AppResult<Sale> {
        self.in_transaction(company_id, "create_sale", |tx| SaleReconciler::create(tx, input))
    }

    /// Updates a sale.
    pub fn update_sale(
        &self,
        company_id: CompanyId,
        id: SaleId,
        input: SaleInput,
    ) -> AppResult<Sale> {
        self.in_transaction(company_id, "update_sale", |tx| {
            SaleReconciler::update(tx, id, input)
        })
    }

    /// Deletes a sale.
    pub fn delete_sale(&self, company_id: CompanyId, id: SaleId) -> AppResult<()> {
        self.in_transaction(company_id, "delete_sale", |tx| SaleReconciler::delete(tx, id))
    }

    /// Looks up a sale.
    pub fn sale(&self, company_id: CompanyId, id: SaleId) -> AppResult<Sale> {
        self.read(company_id, |snapshot| snapshot.sale(id))
    }

    // ========== Plumbing ==========

    /// Runs `operation` in one write transaction: commit on `Ok`, rollback
    /// on `Err`.
    fn in_transaction<T, E, F>(
        &self,
        company_id: CompanyId,
        operation: &'static str,
        f: F,
    ) -> AppResult<T>
    where
        F: FnOnce(&mut S::Tx) -> Result<T, E>,
        E: Display + Into<AppError>,
    {
        let mut tx = self.store.begin(company_id)?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback();
                let message = err.to_string();
                let app_err: AppError = err.into();
                if matches!(app_err, AppError::Internal(_)) {
                    error!(
                        company_id = %company_id,
                        operation,
                        error = %message,
                        "Generated postings rejected"
                    );
                } else {
                    warn!(
                        company_id = %company_id,
                        operation,
                        error = %message,
                        "Operation rolled back"
                    );
                }
                Err(app_err)
            }
        }
    }

    fn read<T, E, F>(&self, company_id: CompanyId, f: F) -> AppResult<T>
    where
        F: FnOnce(&S::Snapshot) -> Result<T, E>,
        E: Into<AppError>,
    {
        let snapshot = self.store.snapshot(company_id)?;
        f(&snapshot).map_err(Into::into)
    }
}
