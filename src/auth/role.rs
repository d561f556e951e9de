use serde::{Deserialize, Serialize};
use std::fmt;

/// Account roles within the finance platform
///
/// A closed set: authorization checks match on it exhaustively and the
/// compiler flags any new role that is not wired through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProgramManager,
    FinanceManager,
    Viewer,
}

impl Role {
    /// All roles, for exhaustive authorization tests
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::ProgramManager,
        Role::FinanceManager,
        Role::Viewer,
    ];

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Capability-set check: admins pass every set, everyone else must be
    /// listed. Required sets therefore never enumerate `Admin` explicitly.
    pub fn satisfies(self, required: &[Role]) -> bool {
        self.is_admin() || required.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ProgramManager => "program_manager",
            Role::FinanceManager => "finance_manager",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
