//! Dynamic query composition and pagination.
//!
//! Queries are composed from host-language predicates (ANDed, in
//! order), validated include directives, and dotted-path order
//! clauses. Paths resolve against declared entity metadata at
//! composition time; an unknown segment fails before any store
//! round-trip.

mod composer;
mod page;
mod path;

pub use composer::Query;
pub use page::{Page, PageRequest};
pub use path::{FieldPath, ResolvedPath, SortDirection};
