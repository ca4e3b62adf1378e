//! How a document is settled: immediately or on credit.

use stockbook_shared::types::AccountId;

use super::error::ReconcileError;
use crate::ledger::AccountRole;

/// The account that balances a document's stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Paid through a cash/bank account.
    Paid(AccountId),
    /// Left open on a payable or receivable account.
    OnCredit(AccountId),
}

impl Settlement {
    /// Picks the settlement account by the document's paid flag.
    ///
    /// The account of the other side is ignored.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` when the account the paid flag calls for is
    /// absent.
    pub fn resolve(
        document: &'static str,
        paid: bool,
        payment_account: Option<AccountId>,
        credit_account: Option<AccountId>,
        credit_role: AccountRole,
    ) -> Result<Self, ReconcileError> {
        if paid {
            payment_account
                .map(Self::Paid)
                .ok_or(ReconcileError::MissingAccount {
                    document,
                    role: AccountRole::Payment,
                })
        } else {
            credit_account
                .map(Self::OnCredit)
                .ok_or(ReconcileError::MissingAccount {
                    document,
                    role: credit_role,
                })
        }
    }

    /// The settlement account.
    #[must_use]
    pub const fn account_id(self) -> AccountId {
        match self {
            Self::Paid(id) | Self::OnCredit(id) => id,
        }
    }
}
