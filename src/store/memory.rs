//! In-memory user store for development and testing
//!
//! Keeps all accounts behind a single `RwLock`; the write section in
//! `redeem_reset` is what makes redemption atomic against concurrent
//! attempts with the same token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{normalize_email, Account, UserStore};
use crate::error::{LedgerGateError, Result};
use crate::security::constant_time_eq;

/// In-memory account storage keyed by account id
pub struct MemoryUserStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts (test helper)
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// Fetch by id (test helper)
    pub async fn get(&self, id: &str) -> Option<Account> {
        self.accounts.read().await.get(id).cloned()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let needle = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == needle).cloned())
    }

    async fn find_by_reset_hash(&self, digest: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| {
                a.password_reset_hash
                    .as_deref()
                    .map_or(false, |stored| constant_time_eq(stored, digest))
            })
            .cloned())
    }

    async fn save(&self, mut account: Account) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts
            .values()
            .find(|a| a.email == account.email && a.id != account.id)
        {
            return Err(LedgerGateError::StorageError(format!(
                "email already registered to account {}",
                existing.id
            )));
        }
        account.updated_at = Utc::now();
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn redeem_reset(
        &self,
        digest: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        // Single write section: match, mutate and clear under one lock so a
        // concurrent attempt with the same digest observes cleared fields.
        let mut accounts = self.accounts.write().await;

        let matching_id = accounts
            .values()
            .find(|a| {
                let digest_matches = a
                    .password_reset_hash
                    .as_deref()
                    .map_or(false, |stored| constant_time_eq(stored, digest));
                let still_valid = a.password_reset_expires.map_or(false, |exp| exp > now);
                digest_matches && still_valid
            })
            .map(|a| a.id.clone());

        match matching_id {
            Some(id) => {
                let account = accounts
                    .get_mut(&id)
                    .ok_or_else(|| LedgerGateError::StorageError("account vanished".to_string()))?;
                account.password_hash = new_password_hash.to_string();
                account.password_reset_hash = None;
                account.password_reset_expires = None;
                account.updated_at = now;
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }
}
