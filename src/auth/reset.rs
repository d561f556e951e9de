//! One-time password reset tokens
//!
//! Two-step flow: request a reset (generic ack regardless of account
//! existence), then redeem the raw token for a new password. Only the
//! SHA-256 digest of the token is ever stored; the raw token travels once,
//! through the notifier, and is never logged.

use chrono::Duration;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::auth::credentials::hash_password;
use crate::clock::Clock;
use crate::constants::{MIN_PASSWORD_LENGTH, RESET_TOKEN_BYTES};
use crate::error::{LedgerGateError, Result};
use crate::notify::Notifier;
use crate::security::constant_time_eq;
use crate::store::{normalize_email, Account, UserStore};

/// Generate a raw reset token: 32 cryptographically random bytes, hex-encoded
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    hex_encode(&bytes)
}

/// Hex SHA-256 digest of a raw reset token - the only form that is stored
pub fn reset_digest(raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// Manages the reset-token lifecycle against the user store
pub struct PasswordResetManager {
    store: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl PasswordResetManager {
    pub fn new(
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            ttl,
        }
    }

    /// Start a reset for `email`. Always succeeds from the caller's point of
    /// view so the wire response cannot reveal whether the account exists;
    /// storage and dispatch failures are logged here instead. The returned
    /// bool says whether an account was found - for server-side logging
    /// only, never for the response.
    pub async fn request_reset(&self, email: &str) -> Result<bool> {
        let normalized = normalize_email(email);

        let account = match self.store.find_by_email(&normalized).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                log::debug!("password reset requested for unknown email");
                return Ok(false);
            }
            Err(e) => {
                log::error!("password reset lookup failed: {}", e);
                return Ok(false);
            }
        };

        let raw_token = generate_reset_token();
        let expires = self.clock.now() + self.ttl;

        // Overwrite any pending reset: at most one outstanding token per
        // account, and issuing a new one invalidates the old.
        let mut updated = account;
        updated.password_reset_hash = Some(reset_digest(&raw_token));
        updated.password_reset_expires = Some(expires);
        let account = match self.store.save(updated).await {
            Ok(account) => account,
            Err(e) => {
                log::error!("failed to persist reset token: {}", e);
                return Ok(true);
            }
        };

        let body = format!(
            "A password reset was requested for your account.\n\
             Use this token within {} minutes: {}\n\
             If you did not request a reset, ignore this message.",
            self.ttl.num_minutes(),
            raw_token
        );
        if let Err(e) = self
            .notifier
            .send(&account.email, "Password reset", &body)
            .await
        {
            // Same generic ack regardless; the operator sees the failure.
            log::error!("reset notification dispatch failed: {}", e);
        }

        Ok(true)
    }

    /// Redeem a raw token for a new password.
    ///
    /// Wrong, expired and already-consumed tokens all yield
    /// [`LedgerGateError::InvalidResetToken`]; a too-short password yields a
    /// specific validation error and leaves the token pending.
    pub async fn redeem(&self, raw_token: &str, new_password: &str) -> Result<Account> {
        let digest = reset_digest(raw_token);
        let now = self.clock.now();

        let candidate = self.store.find_by_reset_hash(&digest).await?;
        let matched = candidate.as_ref().map_or(false, |account| {
            let digest_matches = account
                .password_reset_hash
                .as_deref()
                .map_or(false, |stored| constant_time_eq(stored, &digest));
            let still_valid = account
                .password_reset_expires
                .map_or(false, |exp| exp > now);
            digest_matches && still_valid
        });
        if !matched {
            log::warn!("reset redemption failed: no matching unexpired token");
            return Err(LedgerGateError::InvalidResetToken);
        }

        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(LedgerGateError::ValidationError(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        let new_hash = hash_password(new_password)?;

        // The store applies match-and-clear atomically; a concurrent
        // redemption that lost the race gets None here.
        match self.store.redeem_reset(&digest, &new_hash, now).await? {
            Some(account) => {
                log::info!("password reset redeemed for account {}", account.id);
                Ok(account)
            }
            None => {
                log::warn!("reset redemption lost the race or expired mid-flight");
                Err(LedgerGateError::InvalidResetToken)
            }
        }
    }
}
