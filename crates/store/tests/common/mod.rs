//! Shared fixture for the reconciliation tests.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use stockbook_core::Bookkeeper;
use stockbook_core::Company;
use stockbook_core::inventory::NewProduct;
use stockbook_core::ledger::{AccountType, OpenAccountInput, validate_balance};
use stockbook_core::purchase::{Purchase, PurchaseInput};
use stockbook_core::sale::{Sale, SaleInput, SaleItemInput};
use stockbook_core::store::{Store, StoreRead};
use stockbook_shared::AppResult;
use stockbook_shared::types::{AccountId, CostingMethod, CustomerId, ProductId};
use stockbook_store::MemoryStore;

/// A company with a small chart of accounts and one purchasable product.
pub struct Books {
    pub bk: Bookkeeper<MemoryStore>,
    pub company: Company,
    pub inventory: AccountId,
    pub cash: AccountId,
    pub payable: AccountId,
    pub receivable: AccountId,
    pub revenue: AccountId,
    pub cost_of_sale: AccountId,
    pub loss: AccountId,
    pub product: ProductId,
    pub customer: CustomerId,
}

impl Books {
    pub fn new(method: CostingMethod) -> Self {
        Self::with_bookkeeper(Bookkeeper::new(Arc::new(MemoryStore::new())), method)
    }

    /// Registers another company on the same store.
    pub fn with_bookkeeper(bk: Bookkeeper<MemoryStore>, method: CostingMethod) -> Self {
        let company = bk.register_company("Acme Trading", Some(method)).unwrap();
        let open = |name: &str, account_type| {
            bk.open_account(
                company.id,
                OpenAccountInput {
                    name: name.into(),
                    account_type,
                    parent_id: None,
                },
            )
            .unwrap()
            .id
        };

        let inventory = open("Inventory", AccountType::Asset);
        let cash = open("Cash", AccountType::Asset);
        let payable = open("Accounts Payable", AccountType::Liability);
        let receivable = open("Accounts Receivable", AccountType::Asset);
        let revenue = open("Sales", AccountType::Revenue);
        let cost_of_sale = open("Cost of Goods Sold", AccountType::Expense);
        let loss = open("Inventory Shrinkage", AccountType::Expense);

        let mut books = Self {
            bk,
            company,
            inventory,
            cash,
            payable,
            receivable,
            revenue,
            cost_of_sale,
            loss,
            product: ProductId::new(),
            customer: CustomerId::new(),
        };
        books.product = books.add_product("Widget");
        books
    }

    pub fn add_product(&self, name: &str) -> ProductId {
        self.bk
            .register_product(
                self.company.id,
                NewProduct {
                    name: name.into(),
                    purchasable: true,
                    revenue_account: Some(self.revenue),
                    cost_of_sale_account: Some(self.cost_of_sale),
                    inventory_account: self.inventory,
                },
            )
            .unwrap()
            .id
    }

    pub fn purchase_input(
        &self,
        product_id: ProductId,
        quantity: Decimal,
        unit_price: Decimal,
        paid: bool,
    ) -> PurchaseInput {
        PurchaseInput {
            product_id,
            quantity,
            unit_price,
            paid,
            payment_account: Some(self.cash),
            payable_account: Some(self.payable),
        }
    }

    /// Paid purchase of the default product.
    pub fn buy(&self, quantity: Decimal, unit_price: Decimal) -> Purchase {
        self.bk
            .create_purchase(
                self.company.id,
                self.purchase_input(self.product, quantity, unit_price, true),
            )
            .unwrap()
    }

    pub fn sale_input(&self, paid: bool, items: Vec<SaleItemInput>) -> SaleInput {
        SaleInput {
            customer_id: self.customer,
            paid,
            payment_account: Some(self.cash),
            receivable_account: Some(self.receivable),
            items,
        }
    }

    /// Paid single-item sale of the default product.
    pub fn sell(&self, quantity: Decimal, price: Decimal) -> AppResult<Sale> {
        self.bk.create_sale(
            self.company.id,
            self.sale_input(true, vec![SaleItemInput::new(self.product, quantity, price)]),
        )
    }

    pub fn balance(&self, account: AccountId) -> Decimal {
        self.bk.account_balance(self.company.id, account).unwrap()
    }

    pub fn on_hand(&self, product: ProductId) -> Decimal {
        self.bk.current_inventory(self.company.id, product).unwrap()
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot().entries().unwrap().len()
    }

    pub fn snapshot(&self) -> <MemoryStore as Store>::Snapshot {
        self.bk.store().snapshot(self.company.id).unwrap()
    }

    /// Every committed entry satisfies debit side = credit side.
    pub fn assert_all_entries_balanced(&self) {
        let snapshot = self.snapshot();
        for entry in snapshot.entries().unwrap() {
            let lines: Vec<_> = entry
                .transactions
                .iter()
                .map(|t| (snapshot.account(t.account_id).unwrap().normal_side(), t.value))
                .collect();
            if let Err(err) = validate_balance(&lines) {
                panic!("entry {} unbalanced: {err}", entry.id);
            }
        }
    }
}
