//! Double-entry balance validation.
//!
//! Transactions are grouped by the normal side of the account they post to.
//! The signed values on the debit side must sum to the signed values on the
//! credit side. A negative value on a debit-normal account is therefore
//! indistinguishable from a credit of the same magnitude.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::NormalSide;
use super::error::LedgerError;

/// Debit-side and credit-side totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of values posted to debit-normal accounts.
    pub debit: Decimal,
    /// Sum of values posted to credit-normal accounts.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums signed values by normal side.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (NormalSide, Decimal)>,
    {
        let mut totals = Self {
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
        };
        for (side, value) in lines {
            match side {
                NormalSide::Debit => totals.debit += value,
                NormalSide::Credit => totals.credit += value,
            }
        }
        totals
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Validates that a set of side-tagged values forms a balanced entry.
///
/// # Errors
///
/// Returns `EmptyEntry` when there are no lines and `UnbalancedEntry` when
/// the debit side differs from the credit side.
pub fn validate_balance(lines: &[(NormalSide, Decimal)]) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    let totals = EntryTotals::from_lines(lines.iter().copied());
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
            difference: totals.difference(),
        });
    }

    Ok(totals)
}
