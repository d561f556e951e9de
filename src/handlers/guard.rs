//! Request guards for protected routes
//!
//! `with_principal` is the token-validation middleware: it turns the
//! Authorization header into a [`Principal`] or rejects with 401.
//! `require_role` layers the capability-set check on top and rejects with
//! 403. Route handlers in the CRUD layer compose these before their own
//! logic and read the extracted principal without mutating it.

use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::principal::Principal;
use crate::auth::role::Role;
use crate::auth::token::{TokenManager, TokenRejection};
use crate::error::LedgerGateError;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Rejection wrapper for crate errors
#[derive(Debug)]
pub struct ApiReject(pub LedgerGateError);

impl warp::reject::Reject for ApiReject {}

/// Rejection wrapper for bearer-token failures
#[derive(Debug)]
pub struct BearerReject(pub TokenRejection);

impl warp::reject::Reject for BearerReject {}

/// Wrap a crate error into a warp rejection
pub fn reject_with(err: LedgerGateError) -> Rejection {
    warp::reject::custom(ApiReject(err))
}

/// Token-validation filter: extracts a [`Principal`] from the
/// `Authorization: Bearer <token>` header or rejects the request with 401.
///
/// Pure single-shot check per request; a rejected request is never retried
/// server-side.
pub fn with_principal(
    tokens: Arc<TokenManager>,
) -> impl Filter<Extract = (Principal,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let tokens = tokens.clone();
        async move {
            match tokens.authenticate_header(header.as_deref()) {
                Ok(principal) => Ok(principal),
                Err(rejection) => {
                    log_security_event(SecurityEvent::TokenRejected {
                        reason: rejection.reason(),
                    })
                    .await;
                    Err(warp::reject::custom(BearerReject(rejection)))
                }
            }
        }
    })
}

/// Authorization filter: validated principal plus capability-set check.
///
/// Admin passes every set and is never listed in `required`. Runs strictly
/// after token validation, so its 403 is always distinguishable from the
/// 401s of the validation step.
pub fn require_role(
    tokens: Arc<TokenManager>,
    required: Vec<Role>,
) -> impl Filter<Extract = (Principal,), Error = Rejection> + Clone {
    with_principal(tokens).and_then(move |principal: Principal| {
        let required = required.clone();
        async move {
            if principal.satisfies(&required) {
                Ok(principal)
            } else {
                log_security_event(SecurityEvent::AccessDenied {
                    account_id: principal.id.clone(),
                    required: required.clone(),
                })
                .await;
                Err(reject_with(LedgerGateError::Forbidden))
            }
        }
    })
}

#[derive(Serialize)]
struct ErrorMessage {
    message: String,
}

/// Convert rejections into the JSON error replies of the wire contract
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found.".to_string())
    } else if let Some(BearerReject(rejection)) = err.find() {
        (
            StatusCode::UNAUTHORIZED,
            format!("Not authorized, {}.", rejection.reason()),
        )
    } else if let Some(ApiReject(api_err)) = err.find() {
        match api_err {
            LedgerGateError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
            }
            LedgerGateError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Insufficient role for this action.".to_string(),
            ),
            LedgerGateError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired reset token.".to_string(),
            ),
            LedgerGateError::ValidationError(msg) => (StatusCode::BAD_REQUEST, format!("{}.", msg)),
            other => {
                log::error!("internal error while handling request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        }
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid request body.".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed.".to_string(),
        )
    } else {
        log::error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error.".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorMessage { message }),
        status,
    ))
}
