//! Sale document types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockbook_shared::types::{
    AccountId, CompanyId, CustomerId, EntryId, ProductId, SaleId, SaleItemId,
};

/// Goods sold to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier.
    pub id: SaleId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The buyer.
    pub customer_id: CustomerId,
    /// Whether the customer has paid.
    pub paid: bool,
    /// Cash/bank account, used while paid.
    pub payment_account: Option<AccountId>,
    /// Customer claim account, used while unpaid.
    pub receivable_account: Option<AccountId>,
    /// Sold lines, each with its own entry.
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Σ quantity × price over the items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(SaleItem::amount).sum()
    }

    /// Σ cost over the items.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.items.iter().map(|i| i.cost).sum()
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, id: SaleItemId) -> Option<&SaleItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// One sold line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    /// Unique identifier; also the consumption source of its stock draws.
    pub id: SaleItemId,
    /// The product sold.
    pub product_id: ProductId,
    /// Quantity sold.
    pub quantity: Decimal,
    /// Price per unit.
    pub price: Decimal,
    /// Cost of the stock drawn for this line.
    pub cost: Decimal,
    /// Entry recording revenue and cost of sale.
    pub entry_id: EntryId,
}

impl SaleItem {
    /// Quantity × price.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// Input for creating or updating a sale.
#[derive(Debug, Clone)]
pub struct SaleInput {
    /// The buyer.
    pub customer_id: CustomerId,
    /// Whether the customer has paid.
    pub paid: bool,
    /// Required when paid.
    pub payment_account: Option<AccountId>,
    /// Required when unpaid.
    pub receivable_account: Option<AccountId>,
    /// Lines in display order.
    pub items: Vec<SaleItemInput>,
}

/// One line of a [`SaleInput`].
#[derive(Debug, Clone)]
pub struct SaleItemInput {
    /// Existing item to update; `None` adds a new line.
    pub id: Option<SaleItemId>,
    /// The product sold.
    pub product_id: ProductId,
    /// Quantity sold.
    pub quantity: Decimal,
    /// Price per unit.
    pub price: Decimal,
}

impl SaleItemInput {
    /// A new line.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: None,
            product_id,
            quantity,
            price,
        }
    }

    /// Input that keeps an existing item.
    #[must_use]
    pub fn existing(item: &SaleItem, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: Some(item.id),
            product_id: item.product_id,
            quantity,
            price,
        }
    }
}
