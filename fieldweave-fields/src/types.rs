//! Field metadata types.
//!
//! All types serialize to/from YAML via serde. A field definition describes
//! the declared kind of one named attribute and, for option and boolean
//! fields, the labels needed to render a human-readable value instead of a
//! raw code. Entity definitions group the fields of one record type.

use serde::{Deserialize, Serialize};

/// A single option in a select or multi-select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: i32,
    pub label: String,
}

/// The declared kind of a field. Determines how its value is displayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Money,
    Date,
    Boolean {
        #[serde(default = "default_true_label")]
        true_label: String,
        #[serde(default = "default_false_label")]
        false_label: String,
    },
    Select {
        options: Vec<SelectOption>,
    },
    MultiSelect {
        options: Vec<SelectOption>,
    },
    /// Stores the id of a record of another entity type.
    Reference {
        entity: String,
    },
    /// The record's own primary identifier.
    Identifier,
}

fn default_true_label() -> String {
    "Yes".to_string()
}

fn default_false_label() -> String {
    "No".to_string()
}

impl FieldType {
    /// Label for an option code, if this is a select or multi-select field.
    pub fn option_label(&self, code: i32) -> Option<&str> {
        match self {
            FieldType::Select { options } | FieldType::MultiSelect { options } => options
                .iter()
                .find(|o| o.value == code)
                .map(|o| o.label.as_str()),
            _ => None,
        }
    }

    /// Label for a boolean value, if this is a boolean field.
    pub fn boolean_label(&self, value: bool) -> Option<&str> {
        match self {
            FieldType::Boolean {
                true_label,
                false_label,
            } => Some(if value { true_label } else { false_label }),
            _ => None,
        }
    }
}

/// The schema of a single named attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_,
        }
    }

    /// Entity a bare identifier stored in this field points at.
    ///
    /// `own_entity` is the entity of the record holding the field, used for
    /// [`FieldType::Identifier`] fields.
    pub fn reference_target<'a>(&'a self, own_entity: &'a str) -> Option<&'a str> {
        match &self.type_ {
            FieldType::Reference { entity } => Some(entity.as_str()),
            FieldType::Identifier => Some(own_entity),
            _ => None,
        }
    }
}

/// The fields and primary display field of one record type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Look up one field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_options() -> Vec<SelectOption> {
        vec![
            SelectOption {
                value: 1,
                label: "Active".into(),
            },
            SelectOption {
                value: 2,
                label: "Inactive".into(),
            },
        ]
    }

    #[test]
    fn field_type_select_yaml_round_trip() {
        let ft = FieldType::Select {
            options: status_options(),
        };
        let yaml = serde_yaml::to_string(&ft).unwrap();
        let parsed: FieldType = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(ft, parsed);
    }

    #[test]
    fn boolean_labels_default_when_omitted() {
        let ft: FieldType = serde_yaml::from_str("kind: boolean").unwrap();
        assert_eq!(ft.boolean_label(true), Some("Yes"));
        assert_eq!(ft.boolean_label(false), Some("No"));
    }

    #[test]
    fn option_label_lookup() {
        let ft = FieldType::MultiSelect {
            options: status_options(),
        };
        assert_eq!(ft.option_label(2), Some("Inactive"));
        assert_eq!(ft.option_label(9), None);
        assert_eq!(FieldType::Text.option_label(1), None);
    }

    #[test]
    fn field_def_type_renames_to_type_in_yaml() {
        let field = FieldDef::new("name", FieldType::Text);
        let yaml = serde_yaml::to_string(&field).unwrap();
        assert!(yaml.contains("type:"));
        assert!(!yaml.contains("type_:"));
    }

    #[test]
    fn reference_target_for_identifier_uses_own_entity() {
        let id_field = FieldDef::new("accountid", FieldType::Identifier);
        assert_eq!(id_field.reference_target("account"), Some("account"));

        let owner = FieldDef::new(
            "ownerid",
            FieldType::Reference {
                entity: "systemuser".into(),
            },
        );
        assert_eq!(owner.reference_target("account"), Some("systemuser"));
        assert_eq!(
            FieldDef::new("name", FieldType::Text).reference_target("account"),
            None
        );
    }

    #[test]
    fn account_entity_def_from_yaml() {
        let yaml_input = r#"
name: account
primary_field: name
fields:
  - name: name
    type:
      kind: text
  - name: statuscode
    description: "Status reason"
    type:
      kind: select
      options:
        - value: 1
          label: Active
        - value: 2
          label: Inactive
  - name: ownerid
    type:
      kind: reference
      entity: systemuser
  - name: donotemail
    type:
      kind: boolean
      true_label: Do Not Allow
      false_label: Allow
"#;
        let entity: EntityDef = serde_yaml::from_str(yaml_input).unwrap();
        assert_eq!(entity.name, "account");
        assert_eq!(entity.primary_field.as_deref(), Some("name"));
        assert_eq!(entity.fields.len(), 4);

        let status = entity.field("statuscode").unwrap();
        assert_eq!(status.type_.option_label(1), Some("Active"));

        let donotemail = entity.field("donotemail").unwrap();
        assert_eq!(donotemail.type_.boolean_label(true), Some("Do Not Allow"));
        assert!(entity.field("missing").is_none());
    }
}
