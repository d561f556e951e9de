//! Ledger Gate - authentication and authorization core for a role-gated
//! finance management backend
//!
//! This library provides credential verification, bearer token issuance and
//! validation, role-based route guards, the password-reset token lifecycle,
//! and a client-side session cache.

pub mod auth;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod security;
pub mod security_logger;
pub mod session;
pub mod store;

// Re-export main components
pub use config::ServerConfig;
pub use constants::*;
pub use error::{LedgerGateError, Result};
