//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockbook_shared::types::{
    AccountId, CompanyId, EntryId, PurchaseId, SaleId, SaleItemId, TransactionId,
};

/// The business document an entry was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntrySource {
    /// Stock received and paid for.
    PurchasePayment {
        /// The purchase.
        purchase_id: PurchaseId,
    },
    /// Stock received on credit.
    PurchasePayable {
        /// The purchase.
        purchase_id: PurchaseId,
    },
    /// Stock written off against a purchase's own lot.
    PurchaseCorrection {
        /// The purchase.
        purchase_id: PurchaseId,
    },
    /// One line of a sale.
    SaleItem {
        /// The sale.
        sale_id: SaleId,
        /// The line within the sale.
        item_id: SaleItemId,
    },
}

/// A single signed posting to an account.
///
/// The sign expresses increase or decrease; it is not derived from the
/// account's normal side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning entry.
    pub entry_id: EntryId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Signed value.
    pub value: Decimal,
}

/// A group of transactions describing one financial event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub id: EntryId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Human readable description.
    pub description: String,
    /// Document that produced this entry, if any.
    pub source: Option<EntrySource>,
    /// When the entry was first posted.
    pub posted_at: DateTime<Utc>,
    /// Transactions in display order.
    pub transactions: Vec<Transaction>,
}

impl Entry {
    /// Returns the signed value posted to `account_id` by this entry.
    #[must_use]
    pub fn value_for(&self, account_id: AccountId) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .map(|t| t.value)
            .sum()
    }
}

/// Requested posting before it becomes a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// The account to post to.
    pub account_id: AccountId,
    /// Signed value.
    pub value: Decimal,
}

impl Posting {
    /// Creates a posting.
    #[must_use]
    pub const fn new(account_id: AccountId, value: Decimal) -> Self {
        Self { account_id, value }
    }
}
