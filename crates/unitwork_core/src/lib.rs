//! # unitwork Core
//!
//! Generic unit-of-work data-access layer.
//!
//! This crate provides:
//! - A [`UnitOfWork`] scope with typed CRUD over arbitrary entity types
//! - A dynamic query composer with predicate, include, and dotted-path
//!   order directives
//! - A pagination engine with filtered counts and aggregate sums
//! - An audit recorder that snapshots every mutation
//! - A generation-tagged read-through cache with O(1) global
//!   invalidation
//! - A batched bulk-insert path that bypasses per-row tracking
//!
//! Entity metadata lives in a [`SchemaRegistry`] built once at startup;
//! the composer, snapshotter, and bulk loader consult it instead of
//! inspecting types at runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = Arc::new(SchemaRegistry::builder().register::<Order>().build());
//! let backend = Arc::new(InMemoryBackend::new());
//! let mut uow = UnitOfWork::new(backend, registry, identity, sink);
//!
//! uow.add(&order);
//! uow.save_changes()?;
//!
//! let page = uow
//!     .query::<Order>()
//!     .filter(|o| o.total > Decimal::from(100))
//!     .page(&PageRequest::new(1, 20).order_by("contract.length", false), None)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod cache;
mod config;
mod entity;
mod error;
mod graph;
pub mod query;
pub mod schema;
mod scope;

pub use audit::{
    ActorId, Anonymous, AuditAction, AuditRecord, AuditSink, FixedIdentity, Identity,
    IdentityProvider, MemoryAuditSink,
};
pub use cache::QueryCache;
pub use config::CoreConfig;
pub use entity::{Entity, EntityNode, Related};
pub use error::{CoreError, CoreResult};
pub use query::{Page, PageRequest, Query, SortDirection};
pub use schema::{EntitySchema, FieldKind, ScalarKind, SchemaRegistry};
pub use scope::UnitOfWork;

pub use unitwork_store::{
    FieldValue, IncludeSet, InMemoryBackend, RecordKey, Row, StoreBackend, StoreError,
    StoreSession, TableRef,
};
