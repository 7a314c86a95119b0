//! Records, references and field values.
//!
//! A [`Record`] is an identified collection of named [`FieldValue`]s. The
//! template engine only ever reads records; they are created by the caller
//! or by a [`crate::RecordAccess`] implementation.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::ColumnSet;

/// Name of the state field consulted for active-only relationship queries.
pub const STATE_FIELD: &str = "statecode";

/// A pointer to another record, optionally carrying its denormalized display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub entity: String,
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RecordRef {
    pub fn new(entity: impl Into<String>, id: Uuid) -> Self {
        Self {
            entity: entity.into(),
            id,
            name: None,
        }
    }

    /// Attach the display name of the referenced record.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The runtime value of one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum FieldValue {
    #[serde(rename = "empty")]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Money(Decimal),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    OptionSet(i32),
    OptionSets(Vec<i32>),
    Reference(RecordRef),
    References(Vec<RecordRef>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The reference held by this value, if it is a single reference.
    pub fn as_reference(&self) -> Option<&RecordRef> {
        match self {
            FieldValue::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Numeric view of the value, for number-like kinds.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Float(f) => Decimal::from_f64(*f),
            FieldValue::Decimal(d) | FieldValue::Money(d) => Some(*d),
            FieldValue::OptionSet(o) => Some(Decimal::from(*o)),
            _ => None,
        }
    }

    /// Raw, unformatted string form: identifiers for references, codes for options.
    pub fn raw_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Decimal(d) | FieldValue::Money(d) => d.normalize().to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
            FieldValue::Guid(id) => id.to_string(),
            FieldValue::OptionSet(o) => o.to_string(),
            FieldValue::OptionSets(codes) => codes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            FieldValue::Reference(r) => r.id.to_string(),
            FieldValue::References(refs) => refs
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_)
            | FieldValue::Float(_)
            | FieldValue::Decimal(_)
            | FieldValue::Money(_)
            | FieldValue::OptionSet(_) => 2,
            FieldValue::DateTime(_) => 3,
            FieldValue::Text(_) => 4,
            FieldValue::Guid(_) => 5,
            FieldValue::OptionSets(_) => 6,
            FieldValue::Reference(_) => 7,
            FieldValue::References(_) => 8,
        }
    }

    /// Total ordering used when sorting related records. Nulls sort first.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Guid(a), FieldValue::Guid(b)) => a.cmp(b),
            (FieldValue::OptionSets(a), FieldValue::OptionSets(b)) => a.cmp(b),
            (FieldValue::Reference(a), FieldValue::Reference(b)) => {
                a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
            }
            (FieldValue::References(a), FieldValue::References(b)) => a.len().cmp(&b.len()),
            _ => match (self.as_decimal(), other.as_decimal()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<RecordRef> for FieldValue {
    fn from(value: RecordRef) -> Self {
        FieldValue::Reference(value)
    }
}

/// An identified collection of named field values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub entity: String,
    pub id: Uuid,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new(entity: impl Into<String>, id: Uuid) -> Self {
        Self {
            entity: entity.into(),
            id,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style setter used heavily in tests and fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// A reference to this record.
    pub fn to_reference(&self) -> RecordRef {
        RecordRef::new(self.entity.clone(), self.id)
    }

    /// Copy of this record holding only the requested columns.
    pub fn project(&self, columns: &ColumnSet) -> Record {
        match columns {
            ColumnSet::All => self.clone(),
            ColumnSet::Columns(names) => Record {
                entity: self.entity.clone(),
                id: self.id,
                fields: self
                    .fields
                    .iter()
                    .filter(|(name, _)| names.iter().any(|n| n == *name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            },
        }
    }

    /// A record is active unless its state field holds a non-zero code.
    pub fn is_active(&self) -> bool {
        match self.get(STATE_FIELD) {
            Some(FieldValue::OptionSet(code)) => *code == 0,
            Some(FieldValue::Integer(code)) => *code == 0,
            _ => true,
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn field_value_yaml_uses_kind_and_value() {
        let value = FieldValue::OptionSet(3);
        let yaml = serde_yaml::to_string(&value).unwrap();
        assert!(yaml.contains("kind: option-set"));
        assert!(yaml.contains("value: 3"));
    }

    #[test]
    fn null_value_parses_from_empty_kind() {
        let value: FieldValue = serde_yaml::from_str("kind: empty").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn reference_value_from_yaml() {
        let yaml = r#"
kind: reference
value:
  entity: systemuser
  id: 6f9619ff-8b86-d011-b42d-00c04fc964ff
  name: Jo
"#;
        let value: FieldValue = serde_yaml::from_str(yaml).unwrap();
        let reference = value.as_reference().unwrap();
        assert_eq!(reference.entity, "systemuser");
        assert_eq!(reference.name.as_deref(), Some("Jo"));
    }

    #[test]
    fn raw_string_of_reference_is_id() {
        let id = Uuid::new_v4();
        let value = FieldValue::Reference(RecordRef::new("contact", id).with_name("Kim"));
        assert_eq!(value.raw_string(), id.to_string());
    }

    #[test]
    fn raw_string_of_money_is_normalized() {
        let value = FieldValue::Money(Decimal::from_str("12.500").unwrap());
        assert_eq!(value.raw_string(), "12.5");
    }

    #[test]
    fn sort_cmp_mixes_numeric_kinds() {
        let a = FieldValue::Integer(2);
        let b = FieldValue::Float(2.5);
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
        assert_eq!(FieldValue::Null.sort_cmp(&a), Ordering::Less);
        assert_eq!(
            FieldValue::from("b").sort_cmp(&FieldValue::from("a")),
            Ordering::Greater
        );
    }

    #[test]
    fn project_keeps_only_requested_columns() {
        let record = Record::new("account", Uuid::new_v4())
            .with("name", "Acme")
            .with("revenue", 10i64);
        let projected = record.project(&ColumnSet::Columns(vec!["name".into()]));
        assert!(projected.contains("name"));
        assert!(!projected.contains("revenue"));
        assert_eq!(projected.id, record.id);
        assert_eq!(record.project(&ColumnSet::All), record);
    }

    #[test]
    fn inactive_when_state_code_non_zero() {
        let id = Uuid::new_v4();
        assert!(Record::new("contact", id).is_active());
        assert!(Record::new("contact", id)
            .with(STATE_FIELD, FieldValue::OptionSet(0))
            .is_active());
        assert!(!Record::new("contact", id)
            .with(STATE_FIELD, FieldValue::OptionSet(1))
            .is_active());
    }
}
