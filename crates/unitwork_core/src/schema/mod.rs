//! Entity metadata: declared fields, tables, and the schema registry.
//!
//! Instead of inspecting entity types at runtime, every entity type
//! declares an [`EntitySchema`] once. The query composer, audit
//! snapshotter, and bulk loader consult this metadata; nothing in the
//! core reflects over live values.

mod definition;
mod registry;

pub use definition::{EntitySchema, EntitySchemaBuilder, FieldDef, FieldKind, ScalarKind};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
