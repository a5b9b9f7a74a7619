//! Generation-tagged read-through cache.
//!
//! The one component shared across concurrent scopes. Entries carry a
//! sliding expiration and the generation token current at insertion;
//! advancing the token invalidates every older entry in O(1) without
//! touching or locking them.

mod generation;
mod query_cache;

pub use generation::{Generation, GenerationCounter};
pub use query_cache::QueryCache;
