use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LedgerGateError {
    // Authentication errors
    /// Bad credentials or a missing/invalid/expired bearer token.
    /// Always surfaced to clients as a generic 401.
    Unauthenticated,
    /// Internal failure inside the auth machinery (hashing, token encoding).
    AuthError(String),

    // Authorization errors
    /// Valid identity, insufficient role. Surfaced as 403.
    Forbidden,

    // Password reset errors
    /// Wrong, expired or already-consumed reset token. The wire response
    /// never distinguishes which; only the server log does.
    InvalidResetToken,

    // Validation errors
    ValidationError(String),

    // Storage errors
    StorageError(String),

    // Notification errors
    NotifyError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for LedgerGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Invalid credentials"),
            Self::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            Self::Forbidden => write!(f, "Forbidden: insufficient role"),
            Self::InvalidResetToken => write!(f, "Invalid or expired reset token"),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::NotifyError(msg) => write!(f, "Notification error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for LedgerGateError {}

// Generic result type for ledger-gate
pub type Result<T> = std::result::Result<T, LedgerGateError>;
