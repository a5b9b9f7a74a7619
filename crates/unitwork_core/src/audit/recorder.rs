//! Audit recorder with a best-effort outbox.

use crate::audit::record::{AuditAction, AuditRecord};
use crate::audit::sink::AuditSink;
use crate::audit::snapshot;
use crate::audit::IdentityProvider;
use crate::entity::EntityNode;
use std::sync::Arc;
use time::OffsetDateTime;

/// Records audit entries for a unit of work.
///
/// [`AuditRecorder::record`] runs synchronously inside every mutating
/// call, snapshotting the entity before commit. Records accumulate in
/// an outbox that [`AuditRecorder::flush`] drains into the sink.
///
/// Flushing is best-effort by design: the drained batch is handed to
/// the sink exactly once, a failure is logged, and nothing is retried.
/// Audit delivery is therefore not ordered relative to the store
/// commit and can be lost on sink failure, but it can never fail or
/// block the mutation it describes.
pub struct AuditRecorder {
    identity: Arc<dyn IdentityProvider>,
    sink: Arc<dyn AuditSink>,
    outbox: Vec<AuditRecord>,
}

impl AuditRecorder {
    /// Creates a recorder writing to the given sink.
    pub fn new(identity: Arc<dyn IdentityProvider>, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            identity,
            sink,
            outbox: Vec::new(),
        }
    }

    /// Records one mutation of one entity.
    ///
    /// Never fails: a snapshot serialization problem degrades to an
    /// empty snapshot string and the record is still queued.
    pub fn record(&mut self, node: &dyn EntityNode, action: AuditAction) {
        let schema = node.node_schema();
        let snapshot = snapshot::scalar_snapshot(schema, &node.node_row());
        self.outbox.push(AuditRecord {
            action,
            entity_type: schema.type_name().to_string(),
            snapshot,
            occurred_at: OffsetDateTime::now_utc(),
            actor: self.identity.current().actor(),
        });
    }

    /// Drains the outbox into the sink.
    ///
    /// A sink failure is logged and the batch is dropped.
    pub fn flush(&mut self) {
        if self.outbox.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.outbox);
        if let Err(error) = self.sink.append(&batch) {
            tracing::warn!(
                dropped = batch.len(),
                error = %error,
                "audit flush failed, records dropped"
            );
        }
    }

    /// Returns the number of records waiting in the outbox.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("queued", &self.queued())
            .finish_non_exhaustive()
    }
}
