//! Cache generation tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A cache generation token.
///
/// Tokens advance monotonically; an entry whose captured token no
/// longer matches the current one is logically dead regardless of its
/// expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen:{}", self.0)
    }
}

/// Atomically advancing generation counter.
///
/// The token is replaced as an atomic swap, never mutated in place, so
/// concurrent readers observe either the old or the new token and
/// never a torn value.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    /// Creates a counter at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token.
    #[must_use]
    pub fn current(&self) -> Generation {
        Generation(self.0.load(Ordering::SeqCst))
    }

    /// Advances to and returns a new token.
    pub fn advance(&self) -> Generation {
        Generation(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let counter = GenerationCounter::new();
        let first = counter.current();
        let second = counter.advance();
        assert!(second > first);
        assert_eq!(counter.current(), second);
    }

    #[test]
    fn display() {
        let counter = GenerationCounter::new();
        counter.advance();
        assert_eq!(format!("{}", counter.current()), "gen:1");
    }
}
