//! # unitwork Store
//!
//! Backing store abstraction for the unitwork data-access layer.
//!
//! This crate provides the lowest-level store abstraction: tables of
//! rows addressed by record keys. Backends are **row stores** - they
//! do not interpret entity semantics, audit anything, or compose
//! queries. All of that lives in `unitwork_core`.
//!
//! ## Design Principles
//!
//! - Backends expose typed collections as plain rows (get, scan,
//!   atomic batch apply, bulk append)
//! - Reads are non-tracked; there is no change detection at this level
//! - A session is one connection scope; sessions are handed out by
//!   [`StoreBackend::connect`] and owned by exactly one unit of work
//! - No retries: every failure surfaces as a [`StoreError`]
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use unitwork_store::{
//!     FieldValue, InMemoryBackend, RecordKey, Row, RowOp, StoreBackend, TableRef,
//! };
//!
//! let backend = InMemoryBackend::new();
//! let session = backend.connect().unwrap();
//! let table = TableRef::new("sales", "orders");
//!
//! let mut row = Row::new();
//! row.set("id", FieldValue::Int(1));
//! row.set("label", FieldValue::text("first"));
//!
//! session
//!     .apply(&[RowOp::insert(table.clone(), Some(RecordKey::Int(1)), row)])
//!     .unwrap();
//! assert!(session.get(&table, &RecordKey::Int(1)).unwrap().is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;
mod row;
mod value;

pub use backend::{IncludeSet, RowAction, RowOp, StoreBackend, StoreSession};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBackend;
pub use row::{RecordKey, Row, TableRef};
pub use value::FieldValue;
