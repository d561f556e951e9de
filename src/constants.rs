// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

// Token lifetime defaults (overridable through ServerConfig)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 8;
pub const DEFAULT_RESET_TTL_MINUTES: i64 = 15;

// Password policy
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Raw reset tokens are this many random bytes, hex-encoded
pub const RESET_TOKEN_BYTES: usize = 32;

// Minimum wall-clock time for credential checks, to flatten timing differences
pub const DEFAULT_MIN_AUTH_RESPONSE_MS: u64 = 100;
