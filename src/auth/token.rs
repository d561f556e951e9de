use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::principal::Principal;
use crate::auth::role::Role;
use crate::clock::Clock;
use crate::error::{LedgerGateError, Result};
use crate::store::Account;

/// JWT claims carried by a bearer token
///
/// Minimal by design: identifier, display name, role. Password hashes and
/// reset fields never enter a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Platform role
    pub role: Role,
    /// Issued at (UTC timestamp, seconds)
    pub iat: i64,
    /// Expiration time (UTC timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.name.clone(), self.role)
    }
}

/// Why a bearer token was rejected
///
/// All variants map to the same externally visible 401; the distinction
/// exists for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No Authorization header on the request
    MissingToken,
    /// Header present but not of `Bearer <token>` shape
    Malformed,
    /// Signature check or claim decoding failed
    BadSignature,
    /// Signature fine, `exp` in the past
    Expired,
}

impl TokenRejection {
    /// Log label for observability; never used to vary the response status
    pub fn reason(self) -> &'static str {
        match self {
            TokenRejection::MissingToken => "missing token",
            TokenRejection::Malformed => "malformed authorization header",
            TokenRejection::BadSignature => "invalid token",
            TokenRejection::Expired => "expired token",
        }
    }
}

/// Issues and validates bearer tokens with a single shared secret
///
/// The accepted algorithm is pinned to HS256 at construction; the `alg`
/// field of an inbound token is never trusted.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(secret: &str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock below, so that an
        // expired token is distinguishable from a forged one in logs.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            clock,
        }
    }

    /// Issue a signed token for an account. `exp = iat + ttl`.
    pub fn issue(&self, account: &Account) -> Result<String> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: account.id.clone(),
            name: account.name.clone(),
            role: account.role,
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| LedgerGateError::AuthError(format!("Failed to generate token: {}", e)))
    }

    /// Verify a bare token string and derive the principal
    pub fn verify(&self, token: &str) -> std::result::Result<Principal, TokenRejection> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenRejection::BadSignature)?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenRejection::Expired);
        }

        Ok(data.claims.principal())
    }

    /// Validate an inbound `Authorization` header end to end
    pub fn authenticate_header(
        &self,
        header: Option<&str>,
    ) -> std::result::Result<Principal, TokenRejection> {
        let header = header.ok_or(TokenRejection::MissingToken)?;
        let token = extract_bearer_token(header).ok_or(TokenRejection::Malformed)?;
        self.verify(token)
    }
}

/// Extracts the token from a `Bearer <token>` authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Decode claims WITHOUT verifying the signature.
///
/// For the client-side session cache only: drives optimistic UI state and
/// must never gate access to a protected resource. The server re-verifies
/// every request.
pub fn decode_unverified(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::role::Role;
    use crate::clock::ManualClock;

    fn manager(clock: Arc<ManualClock>) -> TokenManager {
        TokenManager::new("unit-test-signing-key-0123456789!", Duration::hours(8), clock)
    }

    fn account() -> Account {
        Account::new(
            "Flora",
            "flora@example.com",
            "unused-hash".to_string(),
            Role::FinanceManager,
        )
    }

    #[test]
    fn test_claims_carry_identity_and_ttl() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager(clock.clone());
        let account = account();

        let token = manager.issue(&account).unwrap();
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.name, "Flora");
        assert_eq!(claims.role, Role::FinanceManager);
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn test_expired_token_distinct_from_bad_signature() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager(clock.clone());
        let token = manager.issue(&account()).unwrap();

        clock.advance(Duration::hours(9));
        assert_eq!(manager.verify(&token), Err(TokenRejection::Expired));
        assert_eq!(
            manager.verify("not.a.token"),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn test_header_states() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager(clock);

        assert_eq!(
            manager.authenticate_header(None),
            Err(TokenRejection::MissingToken)
        );
        assert_eq!(
            manager.authenticate_header(Some("Basic abc")),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(
            manager.authenticate_header(Some("Bearer ")),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager(clock.clone());
        let other =
            TokenManager::new("another-signing-key-9876543210!!!", Duration::hours(8), clock);

        let token = other.issue(&account()).unwrap();
        assert_eq!(manager.verify(&token), Err(TokenRejection::BadSignature));
    }
}
