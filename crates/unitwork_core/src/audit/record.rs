//! Audit record types.

use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// The kind of mutation an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    /// Entity was added.
    Insert,
    /// Entity was updated.
    Update,
    /// Entity was removed.
    Delete,
}

/// The actor recorded on an audit entry.
///
/// Unauthenticated operations record [`ActorId::EMPTY`] (the nil
/// UUID), never an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// The sentinel actor for unauthenticated operations.
    pub const EMPTY: ActorId = ActorId(Uuid::nil());

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true for the unauthenticated sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable audit entry describing a single mutation.
///
/// Created synchronously when the mutation is queued, before commit.
/// Once created a record is never modified, and a failed sink write is
/// never retried.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// The mutation kind.
    pub action: AuditAction,
    /// The entity type name from its declared schema.
    pub entity_type: String,
    /// JSON snapshot of the entity's scalar fields; empty when
    /// serialization degraded.
    pub snapshot: String,
    /// When the mutation was recorded (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    /// The actor that performed the mutation.
    pub actor: ActorId,
}
