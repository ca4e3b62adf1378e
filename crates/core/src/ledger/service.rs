//! Ledger service for posting, replacing and reading entries.
//!
//! All operations run against a company-scoped store handle. Writes go
//! through a [`StoreTx`] and are only visible once the caller commits it.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use rust_decimal::Decimal;
use stockbook_shared::types::{AccountId, EntryId, TransactionId};
use tracing::debug;

use super::account::{Account, AccountType, NormalSide, OpenAccountInput};
use super::entry::{Entry, EntrySource, Posting, Transaction};
use super::error::LedgerError;
use super::validation::{EntryTotals, validate_balance};
use crate::store::{StoreRead, StoreTx};

/// Stateless ledger service.
pub struct LedgerService;

impl LedgerService {
    /// Opens a new account in the handle's company.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parent account does not exist in the company.
    pub fn open_account<T: StoreTx>(
        tx: &mut T,
        input: OpenAccountInput,
    ) -> Result<Account, LedgerError> {
        if let Some(parent_id) = input.parent_id {
            tx.account(parent_id)?;
        }

        let account = Account {
            id: AccountId::new(),
            company_id: tx.company().id,
            name: input.name,
            account_type: input.account_type,
            parent_id: input.parent_id,
            is_active: true,
        };
        tx.save_account(&account)?;
        Ok(account)
    }

    /// Retires an account. Its history stays; new postings are rejected.
    pub fn retire_account<T: StoreTx>(tx: &mut T, id: AccountId) -> Result<Account, LedgerError> {
        let mut account = tx.account(id)?;
        account.is_active = false;
        tx.save_account(&account)?;
        Ok(account)
    }

    /// Changes an account's type while it has no postings.
    ///
    /// # Errors
    ///
    /// Returns `AccountTypeChangeNotAllowed` once any transaction references
    /// the account, since the normal side of existing postings would change.
    pub fn change_account_type<T: StoreTx>(
        tx: &mut T,
        id: AccountId,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        let mut account = tx.account(id)?;
        if account.account_type == account_type {
            return Ok(account);
        }
        if !tx.account_transactions(id)?.is_empty() {
            return Err(LedgerError::AccountTypeChangeNotAllowed(id));
        }

        account.account_type = account_type;
        tx.save_account(&account)?;
        Ok(account)
    }

    /// Validates and persists a new entry.
    ///
    /// # Errors
    ///
    /// Returns `EmptyEntry` or `UnbalancedEntry` if the postings do not
    /// balance, `AccountInactive` for retired accounts, and `NotFound` for
    /// accounts outside the company. Nothing is written on error.
    pub fn post_entry<T: StoreTx>(
        tx: &mut T,
        description: impl Into<String>,
        source: Option<EntrySource>,
        postings: &[Posting],
    ) -> Result<Entry, LedgerError> {
        let entry_id = EntryId::new();
        let transactions = Self::build_transactions(&*tx, entry_id, postings, &[])?;

        let entry = Entry {
            id: entry_id,
            company_id: tx.company().id,
            description: description.into(),
            source,
            posted_at: Utc::now(),
            transactions,
        };
        tx.save_entry(&entry)?;

        debug!(entry_id = %entry.id, lines = entry.transactions.len(), "Entry posted");
        Ok(entry)
    }

    /// Overwrites an entry's transactions with a new posting set.
    ///
    /// Transaction ids are reused position by position. The new set is
    /// validated before anything is written, so a rejected replacement
    /// leaves the stored entry untouched.
    pub fn replace_postings<T: StoreTx>(
        tx: &mut T,
        entry_id: EntryId,
        postings: &[Posting],
    ) -> Result<Entry, LedgerError> {
        let mut entry = tx.entry(entry_id)?;
        let existing: Vec<TransactionId> = entry.transactions.iter().map(|t| t.id).collect();

        entry.transactions = Self::build_transactions(&*tx, entry.id, postings, &existing)?;
        tx.save_entry(&entry)?;

        debug!(entry_id = %entry.id, lines = entry.transactions.len(), "Entry postings replaced");
        Ok(entry)
    }

    /// Deletes an entry and its transactions.
    pub fn delete_entry<T: StoreTx>(tx: &mut T, id: EntryId) -> Result<(), LedgerError> {
        tx.delete_entry(id)?;
        debug!(entry_id = %id, "Entry deleted");
        Ok(())
    }

    /// Checks a posting set without writing anything.
    pub fn validate_postings<R: StoreRead + ?Sized>(
        reader: &R,
        postings: &[Posting],
    ) -> Result<EntryTotals, LedgerError> {
        let lines = Self::resolve_sides(reader, postings)?;
        validate_balance(&lines)
    }

    /// Sum of the signed values of every transaction posted to an account.
    pub fn account_balance<R: StoreRead + ?Sized>(
        reader: &R,
        id: AccountId,
    ) -> Result<Decimal, LedgerError> {
        reader.account(id)?;
        Ok(reader
            .account_transactions(id)?
            .iter()
            .map(|t| t.value)
            .sum())
    }

    /// Balance of an account plus the balances of all its descendants.
    pub fn rollup_balance<R: StoreRead + ?Sized>(
        reader: &R,
        id: AccountId,
    ) -> Result<Decimal, LedgerError> {
        reader.account(id)?;
        let accounts = reader.accounts()?;

        let mut total = Decimal::ZERO;
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            total += Self::account_balance(reader, current)?;
            queue.extend(
                accounts
                    .iter()
                    .filter(|a| a.parent_id == Some(current))
                    .map(|a| a.id),
            );
        }
        Ok(total)
    }

    fn resolve_sides<R: StoreRead + ?Sized>(
        reader: &R,
        postings: &[Posting],
    ) -> Result<Vec<(NormalSide, Decimal)>, LedgerError> {
        postings
            .iter()
            .map(|posting| {
                let account = reader.account(posting.account_id)?;
                if !account.is_active {
                    return Err(LedgerError::AccountInactive(account.id));
                }
                Ok((account.normal_side(), posting.value))
            })
            .collect()
    }

    fn build_transactions<R: StoreRead + ?Sized>(
        reader: &R,
        entry_id: EntryId,
        postings: &[Posting],
        existing: &[TransactionId],
    ) -> Result<Vec<Transaction>, LedgerError> {
        let lines = Self::resolve_sides(reader, postings)?;
        validate_balance(&lines)?;

        Ok(postings
            .iter()
            .enumerate()
            .map(|(i, posting)| Transaction {
                id: existing.get(i).copied().unwrap_or_default(),
                entry_id,
                account_id: posting.account_id,
                value: posting.value,
            })
            .collect())
    }
}
