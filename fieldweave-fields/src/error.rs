//! Error types for the fields registry and record store

use fieldweave_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while loading metadata or datasets
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Entity definition not found
    #[error("entity definition not found: {name}")]
    EntityNotFound { name: String },

    /// Two definitions share the same entity name
    #[error("duplicate entity definition: {name}")]
    DuplicateEntity { name: String },

    /// Fields directory not found
    #[error("fields directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::NotInitialized { .. } => ErrorSeverity::Critical,
            FieldsError::Io(_) => ErrorSeverity::Critical,
            FieldsError::EntityNotFound { .. } => ErrorSeverity::Error,
            FieldsError::DuplicateEntity { .. } => ErrorSeverity::Error,
            FieldsError::Yaml(_) => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::EntityNotFound {
            name: "account".into(),
        };
        assert_eq!(err.to_string(), "entity definition not found: account");
    }

    #[test]
    fn test_not_initialized_is_critical() {
        let err = FieldsError::NotInitialized {
            path: PathBuf::from("/nowhere"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("/nowhere"));
    }
}
