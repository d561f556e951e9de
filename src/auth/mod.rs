//! Authentication and authorization module

pub mod credentials;
pub mod principal;
pub mod reset;
pub mod role;
pub mod token;

// Re-export main components
pub use credentials::{hash_password, verify_password, CredentialVerifier};
pub use principal::Principal;
pub use reset::{generate_reset_token, reset_digest, PasswordResetManager};
pub use role::Role;
pub use token::{decode_unverified, extract_bearer_token, Claims, TokenManager, TokenRejection};
