//! Unit-of-work configuration.

use std::time::Duration;

/// Configuration for a unit of work and its collaborators.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Number of rows written per bulk-insert batch.
    pub bulk_batch_size: usize,

    /// Default sliding expiration for cache entries.
    pub cache_ttl: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            bulk_batch_size: 500,
            cache_ttl: Duration::from_secs(60 * 60), // 60 minutes
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bulk-insert batch size.
    #[must_use]
    pub const fn bulk_batch_size(mut self, size: usize) -> Self {
        self.bulk_batch_size = size;
        self
    }

    /// Sets the default cache sliding expiration.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
