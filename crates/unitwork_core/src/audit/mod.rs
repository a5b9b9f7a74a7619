//! Audit trail for entity mutations.
//!
//! Every `add`/`update`/`remove` on a unit of work records an
//! [`AuditRecord`] synchronously, before commit. Records carry a
//! field-filtered JSON snapshot of the entity, the actor resolved from
//! the current identity provider, and a UTC timestamp.
//!
//! Delivery is explicitly best-effort: records queue in an outbox that
//! `save_changes` drains into the [`AuditSink`]. A sink failure is
//! logged and the drained batch is dropped - audit writes are never
//! retried and never fail the primary mutation.

mod identity;
mod record;
mod recorder;
mod sink;
pub(crate) mod snapshot;

pub use identity::{Anonymous, FixedIdentity, Identity, IdentityProvider};
pub use record::{ActorId, AuditAction, AuditRecord};
pub use recorder::AuditRecorder;
pub use sink::{AuditSink, MemoryAuditSink};
