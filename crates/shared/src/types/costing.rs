//! Per-company inventory costing method.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order in which stock lots are drawn down when quantity is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostingMethod {
    /// First In, First Out. Oldest lots are consumed first.
    #[default]
    #[serde(alias = "FIFO")]
    Fifo,
    /// Last In, First Out. Newest lots are consumed first.
    #[serde(alias = "LIFO")]
    Lifo,
}

impl FromStr for CostingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FIFO" => Ok(Self::Fifo),
            "LIFO" => Ok(Self::Lifo),
            _ => Err(format!("unknown costing method: {s}")),
        }
    }
}

impl fmt::Display for CostingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fifo => write!(f, "FIFO"),
            Self::Lifo => write!(f, "LIFO"),
        }
    }
}
