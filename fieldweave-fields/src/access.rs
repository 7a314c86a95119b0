//! Collaborator contracts the template engine calls through.
//!
//! The engine never fetches records or metadata on its own. It asks a
//! [`RecordAccess`] for records and a [`MetadataAccess`] for field
//! definitions. Both are treated as read-only caches: implementations must
//! be safe to share between threads when renders run concurrently.

use fieldweave_common::{ErrorSeverity, Severity};
use thiserror::Error;
use uuid::Uuid;

use crate::record::{Record, RecordRef};
use crate::types::FieldDef;

/// Which columns a retrieval should populate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSet {
    #[default]
    All,
    Columns(Vec<String>),
}

impl ColumnSet {
    pub fn single(name: impl Into<String>) -> Self {
        ColumnSet::Columns(vec![name.into()])
    }
}

/// One ordering entry of a relationship query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// A one-to-many or many-to-many relationship lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedQuery {
    /// Entity of the related (child) records.
    pub child_entity: String,
    /// Field on the child that points back at the parent.
    pub relation_field: String,
    pub active_only: bool,
    pub order: Vec<OrderBy>,
    pub columns: ColumnSet,
}

/// Failures reported by a [`RecordAccess`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The requested record does not exist
    #[error("{entity} record not found: {id}")]
    NotFound { entity: String, id: Uuid },

    /// No acting principal is known to the collaborator
    #[error("current user is not available")]
    NoCurrentUser,

    /// The backing store could not be reached or answered with a fault
    #[error("record access failed: {message}")]
    Transport { message: String },
}

impl AccessError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl Severity for AccessError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            AccessError::NotFound { .. } => ErrorSeverity::Error,
            AccessError::NoCurrentUser => ErrorSeverity::Error,
            AccessError::Transport { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Record retrieval capability.
pub trait RecordAccess: Send + Sync {
    /// Fetch one record, populating at least the requested columns.
    fn retrieve(&self, entity: &str, id: &Uuid, columns: &ColumnSet) -> Result<Record, AccessError>;

    /// Fetch the records related to `parent`, in relation order.
    fn retrieve_related(
        &self,
        parent: &Record,
        query: &RelatedQuery,
    ) -> Result<Vec<Record>, AccessError>;

    /// The acting principal.
    fn who_am_i(&self) -> Result<RecordRef, AccessError>;

    /// Deep-link URL for a record, when the backing system has one.
    fn record_url(&self, _reference: &RecordRef) -> Option<String> {
        None
    }
}

/// Field metadata lookup capability.
pub trait MetadataAccess: Send + Sync {
    fn field_metadata(&self, entity: &str, field: &str) -> Option<FieldDef>;

    fn primary_field(&self, entity: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_display() {
        let id = Uuid::nil();
        let err = AccessError::NotFound {
            entity: "account".into(),
            id,
        };
        assert_eq!(
            err.to_string(),
            "account record not found: 00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            AccessError::transport("timeout").to_string(),
            "record access failed: timeout"
        );
    }

    #[test]
    fn test_transport_is_critical() {
        assert_eq!(
            AccessError::transport("x").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(AccessError::NoCurrentUser.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_column_set_single() {
        assert_eq!(
            ColumnSet::single("name"),
            ColumnSet::Columns(vec!["name".to_string()])
        );
        assert_eq!(ColumnSet::default(), ColumnSet::All);
    }
}
