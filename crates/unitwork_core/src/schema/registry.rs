//! Schema registry built once at startup.

use crate::entity::Entity;
use crate::schema::EntitySchema;
use std::collections::HashMap;

/// Registry of entity schemas, indexed by type name.
///
/// Built once at startup and shared (typically behind an `Arc`) by
/// every unit of work in the process. Navigation targets are resolved
/// through the registry, so all entity types reachable through
/// navigations must be registered.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    by_name: HashMap<&'static str, &'static EntitySchema>,
}

impl SchemaRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            registry: Self::default(),
        }
    }

    /// Looks up a schema by entity type name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&'static EntitySchema> {
        self.by_name.get(type_name).copied()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Builder for [`SchemaRegistry`].
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    registry: SchemaRegistry,
}

impl SchemaRegistryBuilder {
    /// Registers an entity type's schema.
    #[must_use]
    pub fn register<T: Entity>(mut self) -> Self {
        let schema = T::schema();
        self.registry.by_name.insert(schema.type_name(), schema);
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        self.registry
    }
}
