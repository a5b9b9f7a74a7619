//! In-memory store backend for testing.

use crate::backend::{IncludeSet, RowAction, RowOp, StoreBackend, StoreSession};
use crate::error::{StoreError, StoreResult};
use crate::row::{RecordKey, Row, TableRef};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<RecordKey, Row>,
    next_id: i64,
}

impl Table {
    fn assign_key(&mut self) -> RecordKey {
        self.next_id += 1;
        RecordKey::Int(self.next_id)
    }

    /// Keeps assigned keys ahead of explicitly inserted integer keys.
    fn observe_key(&mut self, key: &RecordKey) {
        if let RecordKey::Int(id) = key {
            self.next_id = self.next_id.max(*id);
        }
    }
}

/// An in-memory row store.
///
/// This backend keeps all tables in memory and is suitable for unit
/// tests, integration tests, and ephemeral use. Tables are created on
/// first write; scanning a table that was never written yields an
/// empty result, matching how a mapped-but-empty relational table
/// behaves.
///
/// Navigation data embedded in rows round-trips untouched, so include
/// directives are accepted and ignored.
///
/// # Failure Injection
///
/// [`InMemoryBackend::set_offline`] makes every subsequent connection
/// and session operation fail with [`StoreError::Connection`], for
/// testing how callers surface connectivity loss.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<HashMap<TableRef, Table>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryBackend {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing or restoring connectivity.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the number of rows currently in a table.
    #[must_use]
    pub fn row_count(&self, table: &TableRef) -> usize {
        self.tables
            .lock()
            .get(table)
            .map_or(0, |t| t.rows.len())
    }

    /// Returns a copy of all rows in a table, in key order.
    #[must_use]
    pub fn rows(&self, table: &TableRef) -> Vec<(RecordKey, Row)> {
        self.tables.lock().get(table).map_or_else(Vec::new, |t| {
            t.rows.iter().map(|(k, r)| (k.clone(), r.clone())).collect()
        })
    }
}

impl StoreBackend for InMemoryBackend {
    fn connect(&self) -> StoreResult<Box<dyn StoreSession>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::connection("backend is offline"));
        }
        Ok(Box::new(InMemorySession {
            tables: Arc::clone(&self.tables),
            offline: Arc::clone(&self.offline),
        }))
    }
}

struct InMemorySession {
    tables: Arc<Mutex<HashMap<TableRef, Table>>>,
    offline: Arc<AtomicBool>,
}

impl InMemorySession {
    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::connection("backend is offline"));
        }
        Ok(())
    }
}

impl StoreSession for InMemorySession {
    fn get(&self, table: &TableRef, key: &RecordKey) -> StoreResult<Option<Row>> {
        self.ensure_online()?;
        let tables = self.tables.lock();
        Ok(tables.get(table).and_then(|t| t.rows.get(key)).cloned())
    }

    fn scan(&self, table: &TableRef, _includes: &IncludeSet) -> StoreResult<Vec<(RecordKey, Row)>> {
        self.ensure_online()?;
        let tables = self.tables.lock();
        Ok(tables.get(table).map_or_else(Vec::new, |t| {
            t.rows.iter().map(|(k, r)| (k.clone(), r.clone())).collect()
        }))
    }

    fn apply(&self, ops: &[RowOp]) -> StoreResult<usize> {
        self.ensure_online()?;
        let mut tables = self.tables.lock();

        // Stage the batch on copies of the touched tables so a
        // mid-batch constraint violation leaves the store untouched.
        let mut staged: HashMap<TableRef, Table> = HashMap::new();
        for op in ops {
            if !staged.contains_key(&op.table) {
                let table = tables.get(&op.table).cloned().unwrap_or_default();
                staged.insert(op.table.clone(), table);
            }
        }

        for op in ops {
            let table = staged
                .get_mut(&op.table)
                .ok_or_else(|| StoreError::unknown_table(op.table.to_string()))?;
            match op.action {
                RowAction::Insert => {
                    let key = match &op.key {
                        Some(key) => {
                            table.observe_key(key);
                            key.clone()
                        }
                        None => table.assign_key(),
                    };
                    let row = op.row.clone().ok_or_else(|| {
                        StoreError::constraint(op.table.to_string(), "insert without a row")
                    })?;
                    if table.rows.contains_key(&key) {
                        return Err(StoreError::constraint(
                            op.table.to_string(),
                            format!("duplicate key {key}"),
                        ));
                    }
                    table.rows.insert(key, row);
                }
                RowAction::Update => {
                    let key = op.key.clone().ok_or_else(|| {
                        StoreError::constraint(op.table.to_string(), "update without a key")
                    })?;
                    let row = op.row.clone().ok_or_else(|| {
                        StoreError::constraint(op.table.to_string(), "update without a row")
                    })?;
                    if !table.rows.contains_key(&key) {
                        return Err(StoreError::constraint(
                            op.table.to_string(),
                            format!("update of missing key {key}"),
                        ));
                    }
                    table.rows.insert(key, row);
                }
                RowAction::Delete => {
                    let key = op.key.clone().ok_or_else(|| {
                        StoreError::constraint(op.table.to_string(), "delete without a key")
                    })?;
                    if table.rows.remove(&key).is_none() {
                        return Err(StoreError::constraint(
                            op.table.to_string(),
                            format!("delete of missing key {key}"),
                        ));
                    }
                }
            }
        }

        // Commit the staged tables.
        for (table_ref, table) in staged {
            tables.insert(table_ref, table);
        }

        Ok(ops.len())
    }

    fn bulk_append(
        &self,
        table: &TableRef,
        columns: &[String],
        rows: &[Row],
    ) -> StoreResult<usize> {
        self.ensure_online()?;
        let mut tables = self.tables.lock();
        let target = tables.entry(table.clone()).or_default();

        for row in rows {
            let key = target.assign_key();
            target.rows.insert(key, row.project(columns));
        }

        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn orders() -> TableRef {
        TableRef::new("sales", "orders")
    }

    fn row(label: &str) -> Row {
        let mut row = Row::new();
        row.set("label", FieldValue::text(label));
        row
    }

    #[test]
    fn insert_and_get() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        let key = RecordKey::Int(1);
        session
            .apply(&[RowOp::insert(orders(), Some(key.clone()), row("a"))])
            .unwrap();

        let found = session.get(&orders(), &key).unwrap();
        assert_eq!(found.unwrap().get("label"), Some(&FieldValue::text("a")));
    }

    #[test]
    fn scan_of_unwritten_table_is_empty() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();
        let rows = session.scan(&orders(), &IncludeSet::none()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn keyless_insert_assigns_sequential_keys() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        session
            .apply(&[
                RowOp::insert(orders(), None, row("a")),
                RowOp::insert(orders(), None, row("b")),
            ])
            .unwrap();

        let rows = backend.rows(&orders());
        assert_eq!(rows[0].0, RecordKey::Int(1));
        assert_eq!(rows[1].0, RecordKey::Int(2));
    }

    #[test]
    fn keyless_insert_never_collides_with_explicit_keys() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        // Persisted row under an explicit key, then a transient one.
        session
            .apply(&[RowOp::insert(orders(), Some(RecordKey::Int(1)), row("a"))])
            .unwrap();
        session
            .apply(&[RowOp::insert(orders(), None, row("b"))])
            .unwrap();

        let rows = backend.rows(&orders());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, RecordKey::Int(2));

        // Explicit and assigned keys interleaved in one batch.
        session
            .apply(&[
                RowOp::insert(orders(), Some(RecordKey::Int(10)), row("c")),
                RowOp::insert(orders(), None, row("d")),
            ])
            .unwrap();
        assert!(backend
            .rows(&orders())
            .iter()
            .any(|(key, _)| *key == RecordKey::Int(11)));
    }

    #[test]
    fn duplicate_insert_is_constraint_violation() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();
        let key = RecordKey::Int(1);

        session
            .apply(&[RowOp::insert(orders(), Some(key.clone()), row("a"))])
            .unwrap();
        let result = session.apply(&[RowOp::insert(orders(), Some(key), row("b"))]);
        assert!(matches!(result, Err(StoreError::Constraint { .. })));
    }

    #[test]
    fn failed_batch_applies_nothing() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        let result = session.apply(&[
            RowOp::insert(orders(), Some(RecordKey::Int(1)), row("a")),
            RowOp::update(orders(), RecordKey::Int(99), row("b")),
        ]);
        assert!(result.is_err());
        assert_eq!(backend.row_count(&orders()), 0);
    }

    #[test]
    fn batch_sees_earlier_ops() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        session
            .apply(&[
                RowOp::insert(orders(), Some(RecordKey::Int(1)), row("a")),
                RowOp::update(orders(), RecordKey::Int(1), row("b")),
                RowOp::delete(orders(), RecordKey::Int(1)),
            ])
            .unwrap();

        assert_eq!(backend.row_count(&orders()), 0);
    }

    #[test]
    fn bulk_append_projects_columns() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();

        let mut wide = Row::new();
        wide.set("label", FieldValue::text("a"));
        wide.set("extra", FieldValue::Int(9));

        let written = session
            .bulk_append(&orders(), &["label".into(), "note".into()], &[wide])
            .unwrap();
        assert_eq!(written, 1);

        let rows = backend.rows(&orders());
        let stored = &rows[0].1;
        assert_eq!(stored.get("label"), Some(&FieldValue::text("a")));
        assert_eq!(stored.get("note"), Some(&FieldValue::Null));
        assert!(!stored.contains("extra"));
    }

    #[test]
    fn offline_backend_fails_everything() {
        let backend = InMemoryBackend::new();
        let session = backend.connect().unwrap();
        backend.set_offline(true);

        assert!(matches!(
            backend.connect(),
            Err(StoreError::Connection { .. })
        ));
        assert!(matches!(
            session.get(&orders(), &RecordKey::Int(1)),
            Err(StoreError::Connection { .. })
        ));
        assert!(matches!(
            session.apply(&[]),
            Err(StoreError::Connection { .. })
        ));
    }
}
