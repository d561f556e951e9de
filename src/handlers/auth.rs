//! Authentication HTTP endpoints
//!
//! Login plus the two-step password reset flow. Responses on the
//! enumeration-prone paths are deliberately uniform; the distinguishing
//! reasons go to the security log only.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use super::guard::reject_with;
use crate::auth::credentials::CredentialVerifier;
use crate::auth::reset::PasswordResetManager;
use crate::auth::token::TokenManager;
use crate::clock::Clock;
use crate::config::ServerConfig;
use crate::error::LedgerGateError;
use crate::notify::Notifier;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::store::{normalize_email, UserStore};

/// Shared state behind the auth endpoints
pub struct AuthContext {
    pub store: Arc<dyn UserStore>,
    pub tokens: Arc<TokenManager>,
    pub verifier: CredentialVerifier,
    pub resets: PasswordResetManager,
}

impl AuthContext {
    pub fn new(
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        jwt_secret: &str,
        token_ttl: chrono::Duration,
        reset_ttl: chrono::Duration,
        min_auth_response: std::time::Duration,
    ) -> Arc<Self> {
        let tokens = Arc::new(TokenManager::new(jwt_secret, token_ttl, clock.clone()));
        let verifier = CredentialVerifier::new(store.clone(), min_auth_response);
        let resets = PasswordResetManager::new(store.clone(), notifier, clock, reset_ttl);

        Arc::new(Self {
            store,
            tokens,
            verifier,
            resets,
        })
    }

    pub fn from_config(
        config: &ServerConfig,
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Self::new(
            store,
            notifier,
            clock,
            &config.jwt_secret,
            chrono::Duration::hours(config.token_ttl_hours),
            chrono::Duration::minutes(config.reset_ttl_minutes),
            config.min_auth_response,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRedeemBody {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// All auth routes: `POST /api/auth/login`,
/// `POST /api/auth/password-reset/request`,
/// `POST /api/auth/password-reset/redeem`
pub fn auth_routes(
    ctx: Arc<AuthContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    login_route(ctx.clone())
        .or(reset_request_route(ctx.clone()))
        .or(reset_redeem_route(ctx))
}

fn with_ctx(
    ctx: Arc<AuthContext>,
) -> impl Filter<Extract = (Arc<AuthContext>,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn login_route(
    ctx: Arc<AuthContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_ctx(ctx))
        .and_then(handle_login)
}

fn reset_request_route(
    ctx: Arc<AuthContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "auth" / "password-reset" / "request")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_ctx(ctx))
        .and_then(handle_reset_request)
}

fn reset_redeem_route(
    ctx: Arc<AuthContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "auth" / "password-reset" / "redeem")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_ctx(ctx))
        .and_then(handle_reset_redeem)
}

async fn handle_login(
    req: LoginRequest,
    ctx: Arc<AuthContext>,
) -> Result<impl Reply, Rejection> {
    match ctx.verifier.verify(&req.email, &req.password).await {
        Ok(account) => {
            let token = ctx.tokens.issue(&account).map_err(reject_with)?;
            log_security_event(SecurityEvent::LoginSucceeded {
                account_id: account.id.clone(),
            })
            .await;
            Ok(warp::reply::json(&LoginResponse { token }))
        }
        Err(LedgerGateError::Unauthenticated) => {
            log_security_event(SecurityEvent::LoginFailed {
                email: normalize_email(&req.email),
            })
            .await;
            Err(reject_with(LedgerGateError::Unauthenticated))
        }
        Err(e) => Err(reject_with(e)),
    }
}

async fn handle_reset_request(
    req: ResetRequestBody,
    ctx: Arc<AuthContext>,
) -> Result<impl Reply, Rejection> {
    // The manager swallows every internal failure; the ack below is the
    // only shape this endpoint ever produces.
    let known_account = ctx.resets.request_reset(&req.email).await.unwrap_or(false);
    log_security_event(SecurityEvent::ResetRequested { known_account }).await;

    Ok(warp::reply::json(&MessageResponse {
        message: "If an account with that email exists, a password reset has been sent."
            .to_string(),
    }))
}

async fn handle_reset_redeem(
    req: ResetRedeemBody,
    ctx: Arc<AuthContext>,
) -> Result<impl Reply, Rejection> {
    match ctx.resets.redeem(&req.token, &req.new_password).await {
        Ok(account) => {
            log_security_event(SecurityEvent::ResetRedeemed {
                account_id: account.id.clone(),
            })
            .await;
            Ok(warp::reply::json(&MessageResponse {
                message: "Password updated successfully.".to_string(),
            }))
        }
        Err(e) => {
            if matches!(e, LedgerGateError::InvalidResetToken) {
                log_security_event(SecurityEvent::ResetRejected).await;
            }
            Err(reject_with(e))
        }
    }
}
