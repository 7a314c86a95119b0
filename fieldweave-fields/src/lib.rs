//! Record model and field metadata for Fieldweave
//!
//! `fieldweave-fields` owns everything the template engine reads but never
//! writes: records, references between them, the field metadata that turns
//! raw option codes into labels, and the two collaborator traits the engine
//! calls through.
//!
//! # Architecture
//!
//! - **Read-only model**: [`Record`] values are owned by the caller; nothing here mutates them during a render
//! - **Narrow contracts**: [`RecordAccess`] and [`MetadataAccess`] are the only seams the engine depends on
//! - **YAML on disk**: [`FieldsContext`] loads one `.yaml` entity definition per file
//! - **In-memory store**: [`RecordStore`] serves records from a YAML dataset for tests and the CLI

pub mod access;
pub mod context;
pub mod error;
pub mod record;
pub mod store;
pub mod types;

pub use access::{AccessError, ColumnSet, MetadataAccess, OrderBy, RecordAccess, RelatedQuery};
pub use context::{FieldsContext, FieldsContextBuilder};
pub use error::{FieldsError, Result};
pub use record::{FieldValue, Record, RecordRef};
pub use store::{Dataset, RecordStore};
pub use types::{EntityDef, FieldDef, FieldType, SelectOption};
