//! Metadata registry.
//!
//! Holds one [`EntityDef`] per record type, loaded from a directory of YAML
//! files or built in memory. Lookups are indexed by entity name, and the
//! registry implements [`MetadataAccess`] so it can be handed straight to
//! the template engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::access::MetadataAccess;
use crate::error::{FieldsError, Result};
use crate::types::{EntityDef, FieldDef};

/// Builder for `FieldsContext`. Created by `FieldsContext::open()`.
pub struct FieldsContextBuilder {
    root: PathBuf,
    extra: Vec<EntityDef>,
}

impl FieldsContextBuilder {
    /// Add an entity definition that is not on disk.
    /// Definitions loaded from disk win over these when names collide.
    pub fn with_entity(mut self, def: EntityDef) -> Self {
        self.extra.push(def);
        self
    }

    /// Build the context: load every `.yaml` file under the root directory.
    pub async fn build(self) -> Result<FieldsContext> {
        let root = self.root;
        if !root.is_dir() {
            return Err(FieldsError::NotInitialized { path: root });
        }

        let mut ctx = FieldsContext {
            root: Some(root),
            entities: Vec::new(),
            entity_index: HashMap::new(),
        };
        ctx.load_entities().await?;

        for def in self.extra {
            if ctx.get_entity(&def.name).is_none() {
                ctx.insert_entity(def)?;
            }
        }

        debug!(entities = ctx.entities.len(), "fields context opened");

        Ok(ctx)
    }
}

/// Registry of entity definitions.
///
/// A directory-backed registry has the structure:
/// ```text
/// fields/
///   account.yaml    ← one EntityDef per file
///   contact.yaml
/// ```
#[derive(Debug, Default)]
pub struct FieldsContext {
    root: Option<PathBuf>,
    entities: Vec<EntityDef>,
    entity_index: HashMap<String, usize>,
}

impl FieldsContext {
    /// Open a fields directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let ctx = FieldsContext::open(path).build().await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> FieldsContextBuilder {
        FieldsContextBuilder {
            root: root.into(),
            extra: Vec::new(),
        }
    }

    /// Build a registry entirely in memory.
    pub fn from_entities(entities: impl IntoIterator<Item = EntityDef>) -> Result<Self> {
        let mut ctx = FieldsContext::default();
        for def in entities {
            ctx.insert_entity(def)?;
        }
        Ok(ctx)
    }

    /// Get an entity definition by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entity_index.get(name).map(|&i| &self.entities[i])
    }

    /// Get one field definition of an entity.
    pub fn get_field(&self, entity: &str, field: &str) -> Option<&FieldDef> {
        self.get_entity(entity).and_then(|e| e.field(field))
    }

    /// All entity definitions, in load order.
    pub fn all_entities(&self) -> &[EntityDef] {
        &self.entities
    }

    /// The root directory path, if this registry was loaded from disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Add an entity definition. Names must be unique.
    pub fn insert_entity(&mut self, def: EntityDef) -> Result<()> {
        if self.entity_index.contains_key(&def.name) {
            return Err(FieldsError::DuplicateEntity { name: def.name });
        }
        let idx = self.entities.len();
        self.entity_index.insert(def.name.clone(), idx);
        self.entities.push(def);
        Ok(())
    }

    async fn load_entities(&mut self) -> Result<()> {
        let Some(root) = self.root.clone() else {
            return Ok(());
        };
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => paths.push(path),
                _ => continue,
            }
        }
        // Directory iteration order is platform dependent.
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path).await?;
            match serde_yaml::from_str::<EntityDef>(&content) {
                Ok(def) => {
                    debug!(name = %def.name, fields = def.fields.len(), "loaded entity definition");
                    self.insert_entity(def)?;
                }
                Err(e) => {
                    tracing::warn!(?path, %e, "skipping invalid entity definition");
                }
            }
        }
        Ok(())
    }
}

impl MetadataAccess for FieldsContext {
    fn field_metadata(&self, entity: &str, field: &str) -> Option<FieldDef> {
        self.get_field(entity, field).cloned()
    }

    fn primary_field(&self, entity: &str) -> Option<String> {
        self.get_entity(entity)
            .and_then(|e| e.primary_field.clone())
    }
}
