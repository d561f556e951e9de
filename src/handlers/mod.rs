//! Request handlers and guards for the HTTP surface

pub mod auth;
pub mod guard;

pub use auth::{auth_routes, AuthContext};
pub use guard::{handle_rejection, require_role, with_principal};
