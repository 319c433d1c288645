//! Domain error types

use thiserror::Error;

/// Errors surfaced by domain operations.
///
/// Business-rule failures (`NotFound`, `Conflict`, `InvalidState`,
/// `Validation`) are expected outcomes; `Storage` carries unexpected
/// persistence failures and is kept distinct so callers can tell the
/// two apart.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this is an expected business-rule failure rather than an
    /// infrastructure problem.
    pub fn is_business(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_key() {
        let e = DomainError::not_found("Slot", "id", 7);
        assert_eq!(e.to_string(), "Not found: Slot with id=7");
        assert!(e.is_business());
    }

    #[test]
    fn storage_is_not_business() {
        let e = DomainError::Storage("connection lost".into());
        assert!(!e.is_business());
    }
}
