//! In-memory record store.
//!
//! [`RecordStore`] implements [`RecordAccess`] over a set of records held in
//! memory, typically loaded from a YAML dataset:
//!
//! ```yaml
//! current_user:
//!   entity: systemuser
//!   id: 6f9619ff-8b86-d011-b42d-00c04fc964ff
//! url_base: https://crm.example.com
//! records:
//!   - entity: account
//!     id: 2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11
//!     fields:
//!       name: { kind: text, value: Acme }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::access::{AccessError, ColumnSet, RecordAccess, RelatedQuery};
use crate::error::Result;
use crate::record::{FieldValue, Record, RecordRef};

/// The on-disk shape of a dataset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_base: Option<String>,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Records keyed by entity and id, in insertion order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: IndexMap<(String, Uuid), Record>,
    current_user: Option<RecordRef>,
    url_base: Option<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut store = RecordStore {
            records: IndexMap::new(),
            current_user: dataset.current_user,
            url_base: dataset.url_base,
        };
        for record in dataset.records {
            store.insert(record);
        }
        store
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let dataset: Dataset = serde_yaml::from_str(yaml)?;
        Ok(Self::from_dataset(dataset))
    }

    /// Load a dataset file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let store = Self::from_yaml_str(&content)?;
        debug!(?path, records = store.len(), "record store loaded");
        Ok(store)
    }

    /// Set the acting principal returned by `who_am_i`.
    pub fn with_current_user(mut self, user: RecordRef) -> Self {
        self.current_user = Some(user);
        self
    }

    /// Base URL used to build record deep links.
    pub fn with_url_base(mut self, base: impl Into<String>) -> Self {
        self.url_base = Some(base.into());
        self
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: Record) {
        self.records
            .insert((record.entity.clone(), record.id), record);
    }

    pub fn get(&self, entity: &str, id: &Uuid) -> Option<&Record> {
        self.records.get(&(entity.to_string(), *id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn points_at(value: Option<&FieldValue>, parent: &Record) -> bool {
    let matches = |r: &RecordRef| r.id == parent.id && r.entity == parent.entity;
    match value {
        Some(FieldValue::Reference(r)) => matches(r),
        Some(FieldValue::References(refs)) => refs.iter().any(matches),
        Some(FieldValue::Guid(id)) => *id == parent.id,
        _ => false,
    }
}

impl RecordAccess for RecordStore {
    fn retrieve(&self, entity: &str, id: &Uuid, columns: &ColumnSet) -> std::result::Result<Record, AccessError> {
        trace!(entity, %id, ?columns, "retrieve");
        self.get(entity, id)
            .map(|r| r.project(columns))
            .ok_or_else(|| AccessError::NotFound {
                entity: entity.to_string(),
                id: *id,
            })
    }

    fn retrieve_related(
        &self,
        parent: &Record,
        query: &RelatedQuery,
    ) -> std::result::Result<Vec<Record>, AccessError> {
        let mut related: Vec<&Record> = self
            .records
            .values()
            .filter(|r| r.entity == query.child_entity)
            .filter(|r| points_at(r.get(&query.relation_field), parent))
            .filter(|r| !query.active_only || r.is_active())
            .collect();

        // Stable sort, last key first, so the first order entry dominates.
        for order in query.order.iter().rev() {
            related.sort_by(|a, b| {
                let null = FieldValue::Null;
                let left = a.get(&order.field).unwrap_or(&null);
                let right = b.get(&order.field).unwrap_or(&null);
                let ord = left.sort_cmp(right);
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        debug!(
            parent = %parent.id,
            child = %query.child_entity,
            relation = %query.relation_field,
            count = related.len(),
            "retrieve related"
        );
        Ok(related.into_iter().map(|r| r.project(&query.columns)).collect())
    }

    fn who_am_i(&self) -> std::result::Result<RecordRef, AccessError> {
        self.current_user.clone().ok_or(AccessError::NoCurrentUser)
    }

    fn record_url(&self, reference: &RecordRef) -> Option<String> {
        self.url_base.as_ref().map(|base| {
            format!(
                "{}/main.aspx?etn={}&id={}&pagetype=entityrecord",
                base.trim_end_matches('/'),
                reference.entity,
                reference.id
            )
        })
    }
}
