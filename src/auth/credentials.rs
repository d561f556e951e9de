//! Password hashing and credential verification
//!
//! Argon2id with per-hash random salts; verification cost is the point.
//! Login failures collapse into a single outcome and are padded to a
//! minimum duration so account existence cannot be probed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{LedgerGateError, Result};
use crate::security::AuthTimer;
use crate::store::{normalize_email, Account, UserStore};

/// Hash a plaintext password into an argon2 PHC string
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerGateError::AuthError(format!("Failed to hash password: {}", e)))
}

/// Check a plaintext password against a stored PHC string
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Verifies login credentials against the user store
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    min_response: Duration,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>, min_response: Duration) -> Self {
        Self {
            store,
            min_response,
        }
    }

    /// `verify(email, password)` - read-only; unknown email and wrong
    /// password both come back as [`LedgerGateError::Unauthenticated`].
    pub async fn verify(&self, email: &str, password: &str) -> Result<Account> {
        let timer = AuthTimer::new(self.min_response);

        let account = self.store.find_by_email(&normalize_email(email)).await?;

        let ok = match &account {
            Some(account) => verify_password(password, &account.password_hash),
            None => {
                // Burn an equivalent hashing round so the absent-account
                // path costs the same as a mismatch.
                let _ = hash_password(password);
                false
            }
        };

        timer.wait().await;

        match (ok, account) {
            (true, Some(account)) => Ok(account),
            _ => Err(LedgerGateError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("correct horse battery!", &hash));
    }

    #[test]
    fn test_garbage_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }
}
