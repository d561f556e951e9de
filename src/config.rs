//! Server configuration module
//! Handles dynamic configuration parameters for the auth server

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MIN_AUTH_RESPONSE_MS, DEFAULT_PORT, DEFAULT_RESET_TTL_MINUTES,
    DEFAULT_TOKEN_TTL_HOURS,
};
use crate::error::{LedgerGateError, Result};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for bearer token signing/validation
    pub jwt_secret: String,
    /// Bearer token lifetime in hours
    pub token_ttl_hours: i64,
    /// Password reset token lifetime in minutes
    pub reset_ttl_minutes: i64,
    /// Minimum duration of a credential check response
    pub min_auth_response: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-test-jwt-signing-key-0123456789-never-in-production".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            reset_ttl_minutes: DEFAULT_RESET_TTL_MINUTES,
            min_auth_response: Duration::from_millis(5),
        }
    }

    /// Validate that the JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(LedgerGateError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(LedgerGateError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LedgerGateError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("LEDGER_GATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("LEDGER_GATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("LEDGER_GATE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                LedgerGateError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let token_ttl_hours = env::var("LEDGER_GATE_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let reset_ttl_minutes = env::var("LEDGER_GATE_RESET_TTL_MINUTES")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_RESET_TTL_MINUTES);

        let min_auth_response_ms = env::var("LEDGER_GATE_MIN_AUTH_RESPONSE_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_MIN_AUTH_RESPONSE_MS);

        if token_ttl_hours <= 0 {
            return Err(LedgerGateError::ConfigError(
                "LEDGER_GATE_TOKEN_TTL_HOURS must be a positive number of hours".to_string(),
            ));
        }
        if reset_ttl_minutes <= 0 {
            return Err(LedgerGateError::ConfigError(
                "LEDGER_GATE_RESET_TTL_MINUTES must be a positive number of minutes".to_string(),
            ));
        }

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_hours,
            reset_ttl_minutes,
            min_auth_response: Duration::from_millis(min_auth_response_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ServerConfig::default() is not allowed for security reasons")]
    fn test_default_panics() {
        let _ = ServerConfig::default();
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.jwt_secret.contains("unit-test"));
        assert_eq!(config.reset_ttl_minutes, 15);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = ServerConfig::validate_jwt_secret("too-short");
        assert!(result.is_err());
    }

    #[test]
    fn test_insecure_pattern_rejected() {
        let result =
            ServerConfig::validate_jwt_secret("this-is-a-default-key-padded-to-32-chars!!");
        assert!(result.is_err());
    }

    #[test]
    fn test_alphabetic_only_secret_rejected() {
        let result =
            ServerConfig::validate_jwt_secret("abcdefghijklmnopqrstuvwxyzabcdefghij");
        assert!(result.is_err());
    }

    #[test]
    fn test_strong_secret_accepted() {
        let result =
            ServerConfig::validate_jwt_secret("k9#mQ2xv8LpR4tYw7nZj3FbG6hD1sA5e!cU0");
        assert!(result.is_ok());
    }
}
