//! The authenticated identity performing an operation.

use serde::{Deserialize, Serialize};

use openwatch_core::types::UserId;

use super::role::UserRole;

/// An already-authenticated caller.
///
/// Token verification happens outside the core; this value is trusted as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier.
    pub id: UserId,
    /// Display name, denormalized into records and audit entries.
    pub name: String,
    /// Role at the time of the request.
    pub role: UserRole,
}

impl Actor {
    /// Create a new actor.
    pub fn new(id: UserId, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    /// Whether this actor is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
