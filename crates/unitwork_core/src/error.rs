//! Error types for the unit-of-work layer.

use thiserror::Error;
use unitwork_store::StoreError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the unit-of-work layer.
///
/// Store failures are fatal to the current operation and surface
/// unchanged. Audit-path failures never appear here; they are logged
/// and swallowed so a snapshot problem cannot fail a mutation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error (connectivity or constraint violation).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An order-by or aggregate path does not resolve against the
    /// entity's declared fields. This indicates a caller programming
    /// error and is raised at composition time, before any store
    /// round-trip.
    #[error("sort field `{path}` does not resolve: unknown segment `{segment}`")]
    InvalidSortField {
        /// The full dotted path as requested.
        path: String,
        /// The segment that failed to resolve.
        segment: String,
    },

    /// A stored row could not be decoded into its entity type.
    #[error("invalid row format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid sort field error.
    pub fn invalid_sort_field(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::InvalidSortField {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
