//! Actor identity resolution.

use crate::audit::record::ActorId;
use uuid::Uuid;

/// The authenticated principal of the current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Whether the principal is authenticated.
    pub authenticated: bool,
    /// The principal's identifier, if known.
    pub id: Option<Uuid>,
}

impl Identity {
    /// Resolves the actor to record on audit entries.
    ///
    /// Unauthenticated principals, and authenticated ones without an
    /// identifier claim, resolve to [`ActorId::EMPTY`] - never an
    /// absent value.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        if self.authenticated {
            self.id.map(ActorId::from).unwrap_or(ActorId::EMPTY)
        } else {
            ActorId::EMPTY
        }
    }
}

/// Supplies the identity of the current operation.
///
/// Implemented at the boundary (request handler, job runner); the
/// audit recorder consults it at the moment each mutation is recorded.
pub trait IdentityProvider: Send + Sync {
    /// Returns the current identity.
    fn current(&self) -> Identity;
}

/// An identity provider for unauthenticated contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current(&self) -> Identity {
        Identity {
            authenticated: false,
            id: None,
        }
    }
}

/// An identity provider with one fixed authenticated principal.
///
/// Useful for background jobs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity {
    id: Uuid,
}

impl FixedIdentity {
    /// Creates a provider for the given principal.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl IdentityProvider for FixedIdentity {
    fn current(&self) -> Identity {
        Identity {
            authenticated: true,
            id: Some(self.id),
        }
    }
}
