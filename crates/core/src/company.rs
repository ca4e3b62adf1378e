//! Company (tenant) settings.

use serde::{Deserialize, Serialize};
use stockbook_shared::types::{CompanyId, CostingMethod};

/// A company owning a ledger and an inventory.
///
/// Every other entity is scoped to exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Order in which stock lots are consumed by sales.
    pub costing_method: CostingMethod,
}

impl Company {
    /// Creates a company with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, costing_method: CostingMethod) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            costing_method,
        }
    }
}
