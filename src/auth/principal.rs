use serde::{Deserialize, Serialize};

use crate::auth::role::Role;

/// The authenticated identity derived from a valid bearer token
///
/// Ephemeral: reconstructed on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Platform role
    pub role: Role,
}

impl Principal {
    pub fn new(id: String, name: String, role: Role) -> Self {
        Self { id, name, role }
    }

    /// Capability-set check, delegating to [`Role::satisfies`]
    pub fn satisfies(&self, required: &[Role]) -> bool {
        self.role.satisfies(required)
    }

    /// UI hint: which dashboard the client should land on after login.
    ///
    /// Non-authoritative. Navigation built on this must be backed by a
    /// server-side role check on every route it reaches.
    pub fn landing_page(&self) -> &'static str {
        if self.role.is_admin() {
            "/dashboard/users"
        } else {
            "/dashboard"
        }
    }

    /// UI hint: whether to show user-management navigation. Same caveat as
    /// [`Principal::landing_page`].
    pub fn shows_user_management(&self) -> bool {
        self.role.is_admin()
    }
}
