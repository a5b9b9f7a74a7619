//! Entity schema definitions.

use unitwork_store::TableRef;

/// The column type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Boolean column.
    Bool,
    /// Integer column.
    Int,
    /// Exact decimal column.
    Decimal,
    /// Text column.
    Text,
    /// UUID column.
    Uuid,
    /// UTC timestamp column.
    Timestamp,
}

/// The declared kind of one entity field.
///
/// Only scalar fields become columns; nested and collection fields are
/// navigations, excluded from audit snapshots and bulk-load column
/// sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain column.
    Scalar {
        /// The column type.
        kind: ScalarKind,
        /// Whether the column accepts null values.
        nullable: bool,
    },
    /// A single related entity.
    Nested {
        /// Type name of the related entity.
        target: &'static str,
    },
    /// A set of related entities.
    Collection {
        /// Type name of the related entities.
        target: &'static str,
    },
}

impl FieldKind {
    /// Returns true for scalar fields.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar { .. })
    }

    /// Returns the navigation target type name, if any.
    #[must_use]
    pub fn navigation_target(&self) -> Option<&'static str> {
        match self {
            Self::Nested { target } | Self::Collection { target } => Some(target),
            Self::Scalar { .. } => None,
        }
    }
}

/// One declared field of an entity.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: &'static str,
    kind: FieldKind,
}

impl FieldDef {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// Declared metadata for one entity type.
///
/// Built once per type (typically inside a `OnceLock`) and shared as
/// `&'static` references through the [`SchemaRegistry`].
///
/// [`SchemaRegistry`]: crate::schema::SchemaRegistry
#[derive(Debug, Clone)]
pub struct EntitySchema {
    type_name: &'static str,
    table: TableRef,
    key_field: &'static str,
    fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Starts building a schema for a type backed by a table.
    #[must_use]
    pub fn builder(type_name: &'static str, table: TableRef) -> EntitySchemaBuilder {
        EntitySchemaBuilder {
            type_name,
            table,
            key_field: "id",
            fields: Vec::new(),
        }
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the backing table reference.
    #[must_use]
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Returns the name of the identity field.
    #[must_use]
    pub fn key_field(&self) -> &'static str {
        self.key_field
    }

    /// Returns all declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a navigation field (nested or collection) by name.
    #[must_use]
    pub fn navigation(&self, name: &str) -> Option<&FieldDef> {
        self.field(name)
            .filter(|f| f.kind.navigation_target().is_some())
    }

    /// Returns the names of all scalar fields, in declaration order.
    ///
    /// This is the bulk-load column set and the audit snapshot field
    /// set.
    #[must_use]
    pub fn scalar_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.kind.is_scalar())
            .map(|f| f.name.to_string())
            .collect()
    }
}

/// Builder for [`EntitySchema`].
#[derive(Debug)]
pub struct EntitySchemaBuilder {
    type_name: &'static str,
    table: TableRef,
    key_field: &'static str,
    fields: Vec<FieldDef>,
}

impl EntitySchemaBuilder {
    /// Names the identity field (default `id`).
    #[must_use]
    pub fn key(mut self, name: &'static str) -> Self {
        self.key_field = name;
        self
    }

    /// Declares a non-nullable scalar field.
    #[must_use]
    pub fn scalar(mut self, name: &'static str, kind: ScalarKind) -> Self {
        self.fields.push(FieldDef {
            name,
            kind: FieldKind::Scalar {
                kind,
                nullable: false,
            },
        });
        self
    }

    /// Declares a nullable scalar field.
    #[must_use]
    pub fn nullable(mut self, name: &'static str, kind: ScalarKind) -> Self {
        self.fields.push(FieldDef {
            name,
            kind: FieldKind::Scalar {
                kind,
                nullable: true,
            },
        });
        self
    }

    /// Declares a nested navigation to a single related entity.
    #[must_use]
    pub fn nested(mut self, name: &'static str, target: &'static str) -> Self {
        self.fields.push(FieldDef {
            name,
            kind: FieldKind::Nested { target },
        });
        self
    }

    /// Declares a collection navigation to related entities.
    #[must_use]
    pub fn collection(mut self, name: &'static str, target: &'static str) -> Self {
        self.fields.push(FieldDef {
            name,
            kind: FieldKind::Collection { target },
        });
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> EntitySchema {
        EntitySchema {
            type_name: self.type_name,
            table: self.table,
            key_field: self.key_field,
            fields: self.fields,
        }
    }
}
