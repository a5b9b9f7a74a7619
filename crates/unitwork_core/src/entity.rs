//! Entity traits.

use crate::error::CoreResult;
use crate::schema::EntitySchema;
use unitwork_store::{RecordKey, Row};

/// A persistable entity type.
///
/// Implementations declare their metadata once via [`Entity::schema`]
/// and convert themselves to and from store rows, the same way a codec
/// converts an entity to and from its wire form. An entity is
/// *transient* while [`Entity::key`] is `None` and *persisted* once an
/// identity is assigned.
///
/// Navigation data may be embedded in the row (document-style) or left
/// out entirely; either way, the declared schema decides what the
/// audit snapshotter and bulk loader see.
///
/// # Example
///
/// ```rust,ignore
/// impl Entity for Order {
///     fn schema() -> &'static EntitySchema {
///         SCHEMA.get_or_init(|| {
///             EntitySchema::builder("Order", TableRef::new("sales", "orders"))
///                 .key("id")
///                 .scalar("id", ScalarKind::Int)
///                 .scalar("total", ScalarKind::Decimal)
///                 .nested("contract", "Contract")
///                 .build()
///         })
///     }
///
///     fn key(&self) -> Option<RecordKey> {
///         self.id.map(RecordKey::Int)
///     }
///     // ...
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Returns the declared schema for this type.
    fn schema() -> &'static EntitySchema
    where
        Self: Sized;

    /// Returns the identity, or `None` while transient.
    fn key(&self) -> Option<RecordKey>;

    /// Converts this entity into a row.
    fn to_row(&self) -> Row;

    /// Reconstructs an entity from its key and stored row.
    fn from_row(key: &RecordKey, row: &Row) -> CoreResult<Self>
    where
        Self: Sized;

    /// Returns the related entities behind a navigation field.
    ///
    /// The default returns [`Related::None`] for every navigation,
    /// which is correct for entities without loaded navigation data.
    fn related(&self, navigation: &str) -> Related<'_> {
        let _ = navigation;
        Related::None
    }
}

/// Related entities reachable through one navigation field.
pub enum Related<'a> {
    /// Navigation is absent or not loaded.
    None,
    /// A single related entity.
    One(&'a dyn EntityNode),
    /// A set of related entities.
    Many(Vec<&'a dyn EntityNode>),
}

/// Object-safe view of an entity, used by graph traversal and the
/// audit recorder.
///
/// Blanket-implemented for every [`Entity`]; never implemented by
/// hand.
pub trait EntityNode: Send + Sync {
    /// The declared schema for this node's type.
    fn node_schema(&self) -> &'static EntitySchema;

    /// The node's identity, or `None` while transient.
    fn node_key(&self) -> Option<RecordKey>;

    /// The node converted to a row.
    fn node_row(&self) -> Row;

    /// Related entities behind a navigation field.
    fn node_related(&self, navigation: &str) -> Related<'_>;
}

impl<T: Entity> EntityNode for T {
    fn node_schema(&self) -> &'static EntitySchema {
        T::schema()
    }

    fn node_key(&self) -> Option<RecordKey> {
        self.key()
    }

    fn node_row(&self) -> Row {
        self.to_row()
    }

    fn node_related(&self, navigation: &str) -> Related<'_> {
        self.related(navigation)
    }
}
