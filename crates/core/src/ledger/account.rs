//! Chart of accounts domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stockbook_shared::types::{AccountId, CompanyId};

use super::error::LedgerError;

/// Account classification.
///
/// The type fixes the account's normal side for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned by the company.
    Asset,
    /// Obligations owed to others.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Distributions to owners.
    Dividend,
    /// Costs incurred.
    Expense,
    /// Income earned.
    Revenue,
}

/// The side on which an account's balance increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal (Asset, Dividend, Expense).
    Debit,
    /// Credit-normal (Liability, Equity, Revenue).
    Credit,
}

impl AccountType {
    /// Returns the normal side for this account type.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Dividend | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "dividend" => Ok(Self::Dividend),
            "expense" => Ok(Self::Expense),
            "revenue" => Ok(Self::Revenue),
            _ => Err(LedgerError::UnknownAccountType(s.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Dividend => "dividend",
            Self::Expense => "expense",
            Self::Revenue => "revenue",
        };
        f.write_str(name)
    }
}

/// The part an account plays for a document or product.
///
/// Used to report which reference is missing when a document cannot be
/// reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Stock-on-hand account of a product.
    Inventory,
    /// Sales income account of a product.
    Revenue,
    /// Cost of goods sold account of a product.
    CostOfSale,
    /// Cash/bank account used when a document is paid.
    Payment,
    /// Supplier liability used when a purchase is unpaid.
    Payable,
    /// Customer claim used when a sale is unpaid.
    Receivable,
    /// Expense account absorbing written-off stock.
    Loss,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inventory => "inventory",
            Self::Revenue => "revenue",
            Self::CostOfSale => "cost of sale",
            Self::Payment => "payment",
            Self::Payable => "payable",
            Self::Receivable => "receivable",
            Self::Loss => "loss",
        };
        f.write_str(name)
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account for reporting rollups.
    pub parent_id: Option<AccountId>,
    /// Retired accounts keep their history but accept no new postings.
    pub is_active: bool,
}

impl Account {
    /// Returns the account's normal side.
    #[must_use]
    pub const fn normal_side(&self) -> NormalSide {
        self.account_type.normal_side()
    }
}

/// Input for opening a new account.
#[derive(Debug, Clone)]
pub struct OpenAccountInput {
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional parent account (must belong to the same company).
    pub parent_id: Option<AccountId>,
}
