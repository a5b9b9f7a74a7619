//! Unit-of-work scope over a store backend.
//!
//! A [`UnitOfWork`] accumulates row operations in memory and applies
//! them as one batch in [`UnitOfWork::save_changes`]. Reads go through
//! the same lazily-opened session but never consult the pending batch.

use crate::audit::{AuditAction, AuditRecorder, AuditSink, IdentityProvider};
use crate::config::CoreConfig;
use crate::entity::Entity;
use crate::error::CoreResult;
use crate::graph;
use crate::query::Query;
use crate::schema::SchemaRegistry;
use std::sync::{Arc, OnceLock};
use unitwork_store::{RecordKey, Row, RowOp, StoreBackend, StoreSession};

/// Mutation scope over one backend connection.
pub struct UnitOfWork {
    backend: Arc<dyn StoreBackend>,
    registry: Arc<SchemaRegistry>,
    session: OnceLock<Box<dyn StoreSession>>,
    pending: Vec<RowOp>,
    recorder: AuditRecorder,
    config: CoreConfig,
}

impl UnitOfWork {
    /// Creates a scope with the default [`CoreConfig`].
    pub fn new(
        backend: Arc<dyn StoreBackend>,
        registry: Arc<SchemaRegistry>,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self::with_config(backend, registry, identity, sink, CoreConfig::new())
    }

    /// Creates a scope with an explicit configuration.
    pub fn with_config(
        backend: Arc<dyn StoreBackend>,
        registry: Arc<SchemaRegistry>,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn AuditSink>,
        config: CoreConfig,
    ) -> Self {
        Self {
            backend,
            registry,
            session: OnceLock::new(),
            pending: Vec::new(),
            recorder: AuditRecorder::new(identity, sink),
            config,
        }
    }

    /// Schema registry backing this scope.
    pub(crate) fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Opens the backend session on first use and reuses it afterwards.
    pub(crate) fn session(&self) -> CoreResult<&dyn StoreSession> {
        if let Some(session) = self.session.get() {
            return Ok(session.as_ref());
        }
        let session = self.backend.connect()?;
        Ok(self.session.get_or_init(|| session).as_ref())
    }

    /// Loads one entity by key, or `None` when absent.
    pub fn find<T: Entity>(&self, key: &RecordKey) -> CoreResult<Option<T>> {
        let schema = T::schema();
        let Some(row) = self.session()?.get(schema.table(), key)? else {
            return Ok(None);
        };
        T::from_row(key, &row).map(Some)
    }

    /// Starts a composable query over `T`.
    pub fn query<T: Entity>(&self) -> Query<'_, T> {
        Query::new(self)
    }

    /// Marks an entity for insertion and records an audit entry.
    pub fn add<T: Entity>(&mut self, entity: &T) {
        self.stage(entity, AuditAction::Insert);
    }

    /// Marks every entity in the iterator for insertion.
    pub fn add_all<'a, T, I>(&mut self, entities: I)
    where
        T: Entity,
        I: IntoIterator<Item = &'a T>,
    {
        for entity in entities {
            self.add(entity);
        }
    }

    /// Marks an entity for update and records an audit entry.
    pub fn update<T: Entity>(&mut self, entity: &T) {
        self.stage(entity, AuditAction::Update);
    }

    /// Marks every entity in the iterator for update.
    pub fn update_all<'a, T, I>(&mut self, entities: I)
    where
        T: Entity,
        I: IntoIterator<Item = &'a T>,
    {
        for entity in entities {
            self.update(entity);
        }
    }

    /// Marks an entity for deletion and records an audit entry.
    pub fn remove<T: Entity>(&mut self, entity: &T) {
        self.stage(entity, AuditAction::Delete);
    }

    /// Walks the entity graph rooted at `root` and marks each distinct
    /// node: nodes with a key set are staged as updates, keyless nodes
    /// as inserts. Cycles and shared nodes are marked once.
    pub fn upsert_graph<T: Entity>(&mut self, root: &T) {
        let recorder = &mut self.recorder;
        let pending = &mut self.pending;
        graph::visit_graph(root, |node, action| {
            recorder.record(node, action);
            let table = node.node_schema().table().clone();
            let op = match (action, node.node_key()) {
                (AuditAction::Update, Some(key)) => RowOp::update(table, key, node.node_row()),
                (_, key) => RowOp::insert(table, key, node.node_row()),
            };
            pending.push(op);
        });
    }

    fn stage<T: Entity>(&mut self, entity: &T, action: AuditAction) {
        let schema = T::schema();
        let table = schema.table().clone();
        let op = match action {
            AuditAction::Insert => RowOp::insert(table, entity.key(), entity.to_row()),
            AuditAction::Update => {
                let Some(key) = entity.key() else {
                    tracing::warn!(entity = schema.type_name(), "update staged without a key");
                    return;
                };
                RowOp::update(table, key, entity.to_row())
            }
            AuditAction::Delete => {
                let Some(key) = entity.key() else {
                    tracing::warn!(entity = schema.type_name(), "delete staged without a key");
                    return;
                };
                RowOp::delete(table, key)
            }
        };
        // Audit only what was actually staged; a skipped mutation must
        // not leave a record claiming it happened.
        self.recorder.record(entity, action);
        self.pending.push(op);
    }

    /// Applies all pending operations as one batch.
    ///
    /// Queued audit records are flushed first on a best-effort basis;
    /// an audit failure never blocks the save. On store failure the
    /// pending batch is kept so a later call can retry.
    pub fn save_changes(&mut self) -> CoreResult<usize> {
        self.recorder.flush();
        if self.pending.is_empty() {
            return Ok(0);
        }
        let applied = {
            let session = self.session()?;
            session.apply(&self.pending)?
        };
        self.pending.clear();
        Ok(applied)
    }

    /// Appends rows straight to the store in fixed-size batches.
    ///
    /// Bulk inserts bypass change staging entirely: nothing is queued,
    /// nothing is audited, and only scalar columns declared by the
    /// schema are written.
    pub fn bulk_insert<'a, T, I>(&self, entities: I) -> CoreResult<usize>
    where
        T: Entity,
        I: IntoIterator<Item = &'a T>,
    {
        let schema = T::schema();
        let columns = schema.scalar_columns();
        let rows: Vec<Row> = entities.into_iter().map(Entity::to_row).collect();
        if rows.is_empty() {
            return Ok(0);
        }

        let session = self.session()?;
        let batch = self.config.bulk_batch_size.max(1);
        let mut written = 0;
        for chunk in rows.chunks(batch) {
            written += session.bulk_append(schema.table(), &columns, chunk)?;
        }
        tracing::debug!(
            table = %schema.table(),
            rows = written,
            batch,
            "bulk insert complete"
        );
        Ok(written)
    }

    /// Number of operations queued for the next [`Self::save_changes`].
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Audit records queued for the next flush.
    #[must_use]
    pub fn queued_audits(&self) -> usize {
        self.recorder.queued()
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("pending", &self.pending.len())
            .field("queued_audits", &self.recorder.queued())
            .finish_non_exhaustive()
    }
}
