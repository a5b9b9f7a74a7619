//! Audit sinks.

use crate::audit::record::AuditRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use unitwork_store::{StoreError, StoreResult};

/// Destination for flushed audit records.
///
/// Appends are batch-oriented and best-effort from the caller's point
/// of view: the recorder logs a failed append and drops the batch
/// rather than retrying.
pub trait AuditSink: Send + Sync {
    /// Appends a batch of records.
    fn append(&self, records: &[AuditRecord]) -> StoreResult<()>;
}

/// An in-memory audit sink.
///
/// Collects records for inspection in tests; can be switched into a
/// failing mode to exercise the best-effort flush path.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    failing: AtomicBool,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent append fail (or restores normal
    /// operation).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of all records appended so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if no records have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, records: &[AuditRecord]) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::connection("audit sink unavailable"));
        }
        self.records.lock().extend_from_slice(records);
        Ok(())
    }
}
