//! Store backend and session traits.

use crate::error::StoreResult;
use crate::row::{RecordKey, Row, TableRef};

/// Eager-load directives composed by the query layer.
///
/// Each path names a navigation (possibly dotted, e.g.
/// `contract.owner`). Backends that store navigation data separately
/// use these to materialize related rows; document-style backends that
/// embed navigation data may ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet {
    paths: Vec<String>,
}

impl IncludeSet {
    /// An empty include set (no eager loading).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates an include set from validated navigation paths.
    #[must_use]
    pub fn from_paths(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Returns the navigation paths.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Returns true if no includes were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The kind of mutation a [`RowOp`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Insert a new row.
    Insert,
    /// Replace an existing row.
    Update,
    /// Remove an existing row.
    Delete,
}

/// One pending mutation against a table.
///
/// Ops are applied in the order they were queued; a batch either
/// applies completely or not at all.
#[derive(Debug, Clone)]
pub struct RowOp {
    /// The target table.
    pub table: TableRef,
    /// The mutation kind.
    pub action: RowAction,
    /// The record key. `None` only for inserts of transient records,
    /// in which case the store assigns one.
    pub key: Option<RecordKey>,
    /// The row payload. `None` for deletes.
    pub row: Option<Row>,
}

impl RowOp {
    /// Creates an insert op.
    #[must_use]
    pub fn insert(table: TableRef, key: Option<RecordKey>, row: Row) -> Self {
        Self {
            table,
            action: RowAction::Insert,
            key,
            row: Some(row),
        }
    }

    /// Creates an update op.
    #[must_use]
    pub fn update(table: TableRef, key: RecordKey, row: Row) -> Self {
        Self {
            table,
            action: RowAction::Update,
            key: Some(key),
            row: Some(row),
        }
    }

    /// Creates a delete op.
    #[must_use]
    pub fn delete(table: TableRef, key: RecordKey) -> Self {
        Self {
            table,
            action: RowAction::Delete,
            key: Some(key),
            row: None,
        }
    }
}

/// One connection scope against the store.
///
/// A session is owned by exactly one unit of work and is never shared
/// across concurrent logical operations. Reads are non-tracked: a scan
/// hands back detached rows with no change detection attached.
pub trait StoreSession: Send {
    /// Gets a single row by key. Returns `None` if absent.
    fn get(&self, table: &TableRef, key: &RecordKey) -> StoreResult<Option<Row>>;

    /// Scans all rows of a table, honoring the include directives the
    /// backend supports.
    fn scan(&self, table: &TableRef, includes: &IncludeSet) -> StoreResult<Vec<(RecordKey, Row)>>;

    /// Atomically applies a batch of mutations in order.
    ///
    /// Returns the number of affected rows. On error nothing is
    /// applied and the caller's pending state is left unresolved.
    fn apply(&self, ops: &[RowOp]) -> StoreResult<usize>;

    /// Appends rows directly to a table, bypassing per-row tracking.
    ///
    /// This is the bulk-copy path: `columns` fixes the column set for
    /// every row, and rows are written append-only. Returns the number
    /// of rows written.
    fn bulk_append(&self, table: &TableRef, columns: &[String], rows: &[Row])
        -> StoreResult<usize>;
}

/// A store that can hand out connection-scoped sessions.
pub trait StoreBackend: Send + Sync {
    /// Opens a new session (one connection scope).
    fn connect(&self) -> StoreResult<Box<dyn StoreSession>>;
}
