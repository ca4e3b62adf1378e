//! Demo seeder for Stockbook.
//!
//! Registers a trading company on an in-memory store, buys and sells stock
//! through the reconcilers, and logs the resulting balances.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal_macros::dec;
use stockbook_core::Bookkeeper;
use stockbook_core::inventory::NewProduct;
use stockbook_core::ledger::{AccountType, OpenAccountInput};
use stockbook_core::purchase::PurchaseInput;
use stockbook_core::sale::{SaleInput, SaleItemInput};
use stockbook_shared::AppConfig;
use stockbook_shared::types::{AccountId, CompanyId, CustomerId};
use stockbook_store::MemoryStore;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let bk = Bookkeeper::from_config(Arc::new(MemoryStore::new()), &config);
    let company = bk.register_company("Demo Trading", None)?;
    let accounts = seed_accounts(&bk, company.id)?;

    let widget = bk.register_product(
        company.id,
        NewProduct {
            name: "Widget".into(),
            purchasable: true,
            revenue_account: Some(accounts.revenue),
            cost_of_sale_account: Some(accounts.cost_of_sale),
            inventory_account: accounts.inventory,
        },
    )?;

    for (quantity, unit_price, paid) in [
        (dec!(100), dec!(100), true),
        (dec!(100), dec!(90), false),
        (dec!(50), dec!(95.50), true),
    ] {
        let purchase = bk.create_purchase(
            company.id,
            PurchaseInput {
                product_id: widget.id,
                quantity,
                unit_price,
                paid,
                payment_account: Some(accounts.cash),
                payable_account: Some(accounts.payable),
            },
        )?;
        info!(purchase_id = %purchase.id, %quantity, %unit_price, paid, "Seeded purchase");
    }

    let first = bk
        .product_purchases(company.id, widget.id)?
        .into_iter()
        .next()
        .context("Seeded purchases missing")?;
    bk.record_correction(company.id, first.id, dec!(2), accounts.shrinkage)?;

    let customer = CustomerId::new();
    for (quantity, price, paid) in [(dec!(120), dec!(150), true), (dec!(40), dec!(145), false)] {
        let sale = bk.create_sale(
            company.id,
            SaleInput {
                customer_id: customer,
                paid,
                payment_account: Some(accounts.cash),
                receivable_account: Some(accounts.receivable),
                items: vec![SaleItemInput::new(widget.id, quantity, price)],
            },
        )?;
        info!(sale_id = %sale.id, total = %sale.total(), cost = %sale.total_cost(), "Seeded sale");
    }

    for account in bk.accounts(company.id)? {
        let balance = bk.account_balance(company.id, account.id)?;
        info!(account = %account.name, %balance, "Balance");
    }
    for product in bk.products(company.id)? {
        info!(
            product = %product.name,
            on_hand = %bk.current_inventory(company.id, product.id)?,
            value = %bk.inventory_value(company.id, product.id)?,
            costing_method = %company.costing_method,
            "Stock"
        );
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

struct Accounts {
    inventory: AccountId,
    cash: AccountId,
    payable: AccountId,
    receivable: AccountId,
    revenue: AccountId,
    cost_of_sale: AccountId,
    shrinkage: AccountId,
}

fn seed_accounts(bk: &Bookkeeper<MemoryStore>, company_id: CompanyId) -> anyhow::Result<Accounts> {
    let open = |name: &str, account_type| -> anyhow::Result<AccountId> {
        let account = bk.open_account(
            company_id,
            OpenAccountInput {
                name: name.into(),
                account_type,
                parent_id: None,
            },
        )?;
        Ok(account.id)
    };

    Ok(Accounts {
        inventory: open("Inventory", AccountType::Asset)?,
        cash: open("Cash", AccountType::Asset)?,
        payable: open("Accounts Payable", AccountType::Liability)?,
        receivable: open("Accounts Receivable", AccountType::Asset)?,
        revenue: open("Sales", AccountType::Revenue)?,
        cost_of_sale: open("Cost of Goods Sold", AccountType::Expense)?,
        shrinkage: open("Inventory Shrinkage", AccountType::Expense)?,
    })
}
