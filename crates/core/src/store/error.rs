//! Store error types.

use std::fmt::Display;

use stockbook_shared::types::CompanyId;
use thiserror::Error;

/// Errors raised by a [`Store`](super::Store) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record does not exist inside the current company.
    ///
    /// Records owned by another company are reported the same way.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"account"`.
        entity: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },

    /// The company has not been registered with the store.
    #[error("Company not registered: {0}")]
    CompanyNotRegistered(CompanyId),

    /// The company is already registered.
    #[error("Company already registered: {0}")]
    CompanyAlreadyRegistered(CompanyId),

    /// Backend failure (I/O, poisoned lock, driver error).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Builds a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true for `NotFound` and `CompanyNotRegistered`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::CompanyNotRegistered(_))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::CompanyNotRegistered(_) => "NOT_FOUND",
            Self::CompanyAlreadyRegistered(_) => "CONFLICT",
            Self::Backend(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::CompanyNotRegistered(_) => 404,
            Self::CompanyAlreadyRegistered(_) => 409,
            Self::Backend(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("product", Uuid::nil());
        assert_eq!(
            err.to_string(),
            "product not found: 00000000-0000-0000-0000-000000000000"
        );
        assert!(err.is_not_found());
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_unregistered_company_is_not_found() {
        let err = StoreError::CompanyNotRegistered(CompanyId::from_uuid(Uuid::nil()));
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_backend_is_internal() {
        let err = StoreError::Backend("lock poisoned".into());
        assert!(!err.is_not_found());
        assert_eq!(err.http_status_code(), 500);
    }
}
