//! Purchase document types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockbook_shared::types::{AccountId, CompanyId, EntryId, ProductId, PurchaseId, StockLotId};

use crate::ledger::EntrySource;

/// Stock bought from a supplier.
///
/// A purchase owns exactly one stock lot and exactly one active entry:
/// a payment entry while paid, a payable entry otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier.
    pub id: PurchaseId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The product bought.
    pub product_id: ProductId,
    /// Quantity received.
    pub quantity: Decimal,
    /// Price per unit, also the lot's unit cost.
    pub unit_price: Decimal,
    /// Whether the supplier has been paid.
    pub paid: bool,
    /// Cash/bank account, used while paid.
    pub payment_account: Option<AccountId>,
    /// Supplier liability account, used while unpaid.
    pub payable_account: Option<AccountId>,
    /// The lot created by this purchase.
    pub lot_id: StockLotId,
    /// The active payment or payable entry.
    pub entry_id: EntryId,
    /// Write-offs recorded against the lot.
    pub corrections: Vec<PurchaseCorrection>,
}

impl Purchase {
    /// Quantity × unit price.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Source tag of the active entry.
    #[must_use]
    pub const fn entry_source(&self) -> EntrySource {
        if self.paid {
            EntrySource::PurchasePayment {
                purchase_id: self.id,
            }
        } else {
            EntrySource::PurchasePayable {
                purchase_id: self.id,
            }
        }
    }

    /// Total quantity written off.
    #[must_use]
    pub fn corrected_quantity(&self) -> Decimal {
        self.corrections.iter().map(|c| c.quantity).sum()
    }
}

/// Stock written off against a purchase's own lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCorrection {
    /// Quantity removed.
    pub quantity: Decimal,
    /// Expense account absorbing the cost.
    pub loss_account: AccountId,
    /// Entry moving the cost out of inventory.
    pub entry_id: EntryId,
}

/// Input for creating or updating a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    /// The product bought.
    pub product_id: ProductId,
    /// Quantity received.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Whether the supplier has been paid.
    pub paid: bool,
    /// Required when paid.
    pub payment_account: Option<AccountId>,
    /// Required when unpaid.
    pub payable_account: Option<AccountId>,
}

impl PurchaseInput {
    /// Quantity × unit price.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}
