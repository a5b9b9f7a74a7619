//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the backing store.
///
/// Store errors are always propagated to the caller unchanged and are
/// never retried by the layers above.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or the connection was lost.
    #[error("store connection failed: {message}")]
    Connection {
        /// Description of the connectivity failure.
        message: String,
    },

    /// A constraint was violated while applying a mutation.
    #[error("constraint violation on {table}: {message}")]
    Constraint {
        /// The table where the violation occurred.
        table: String,
        /// Description of the violation.
        message: String,
    },

    /// The referenced table does not exist in the store.
    #[error("unknown table: {table}")]
    UnknownTable {
        /// The missing table.
        table: String,
    },
}

impl StoreError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a constraint violation error.
    pub fn constraint(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown table error.
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable {
            table: table.into(),
        }
    }
}
