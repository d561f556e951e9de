//! Abstract user store interface for pluggable backends
//!
//! The auth core reads and writes accounts through this trait; the CRUD
//! layer that owns the rest of the schema lives elsewhere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::role::Role;
use crate::error::Result;

/// Normalized form of an email address used for lookups.
/// The original schema relied on database collation for this; doing it
/// explicitly keeps every backend honest.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// A platform account as the auth core sees it
///
/// `password_hash` and the reset fields never leave the server: they are
/// skipped on serialization so no handler can leak them by accident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    /// Hex SHA-256 of the raw reset token; present only while a reset is
    /// pending. Set and cleared together with `password_reset_expires`.
    #[serde(skip)]
    pub password_reset_hash: Option<String>,
    #[serde(skip)]
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with a generated id and normalized email
    pub fn new(name: &str, email: &str, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: if name.is_empty() {
                "Unknown".to_string()
            } else {
                name.to_string()
            },
            email: normalize_email(email),
            password_hash,
            role,
            password_reset_hash: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_pending_reset(&self) -> bool {
        self.password_reset_hash.is_some() && self.password_reset_expires.is_some()
    }

    /// Derive the per-request identity from this account
    pub fn principal(&self) -> crate::auth::principal::Principal {
        crate::auth::principal::Principal::new(self.id.clone(), self.name.clone(), self.role)
    }
}

/// User store interface consumed by the auth core
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Look up the account holding a pending reset with this digest
    async fn find_by_reset_hash(&self, digest: &str) -> Result<Option<Account>>;

    /// Insert or update an account
    async fn save(&self, account: Account) -> Result<Account>;

    /// Atomic reset redemption: iff an account's stored reset digest matches
    /// and its expiry is after `now`, set `password_hash` to
    /// `new_password_hash` and clear both reset fields in one update.
    ///
    /// Returns the updated account, or `None` when no account matched -
    /// which callers must report as a generic invalid-token outcome. Two
    /// concurrent calls with the same digest must not both return `Some`.
    async fn redeem_reset(
        &self,
        digest: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>>;
}
