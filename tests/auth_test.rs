use std::sync::Arc;

use chrono::Duration;
use warp::Filter;

use ledger_gate::auth::credentials::hash_password;
use ledger_gate::auth::role::Role;
use ledger_gate::auth::token::decode_unverified;
use ledger_gate::clock::ManualClock;
use ledger_gate::handlers::{auth_routes, handle_rejection, with_principal, AuthContext};
use ledger_gate::notify::LogNotifier;
use ledger_gate::store::{Account, MemoryUserStore, UserStore};

const TEST_SECRET: &str = "integration-test-signing-key-42!!";

async fn seeded_context(clock: Arc<ManualClock>) -> (Arc<AuthContext>, Account) {
    let store = Arc::new(MemoryUserStore::new());
    let account = Account::new(
        "Frida Finance",
        "frida@example.com",
        hash_password("original-password").unwrap(),
        Role::FinanceManager,
    );
    let account = store.save(account).await.unwrap();

    let ctx = AuthContext::new(
        store,
        Arc::new(LogNotifier),
        clock,
        TEST_SECRET,
        Duration::hours(8),
        Duration::minutes(15),
        std::time::Duration::from_millis(1),
    );
    (ctx, account)
}

#[tokio::test]
async fn test_login_returns_token_with_matching_claims() {
    let clock = Arc::new(ManualClock::starting_now());
    let (ctx, account) = seeded_context(clock).await;
    let routes = auth_routes(ctx).recover(handle_rejection);

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({
            "email": "frida@example.com",
            "password": "original-password"
        }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    let token = body["token"].as_str().unwrap();

    let claims = decode_unverified(token).unwrap();
    assert_eq!(claims.sub, account.id);
    assert_eq!(claims.name, "Frida Finance");
    assert_eq!(claims.role, Role::FinanceManager);
    assert_eq!(claims.exp - claims.iat, 8 * 3600);
}

#[tokio::test]
async fn test_login_email_lookup_is_case_insensitive() {
    let clock = Arc::new(ManualClock::starting_now());
    let (ctx, _) = seeded_context(clock).await;
    let routes = auth_routes(ctx).recover(handle_rejection);

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({
            "email": "  FRIDA@Example.COM ",
            "password": "original-password"
        }))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_invalid_credentials_identical_shape() {
    let clock = Arc::new(ManualClock::starting_now());
    let (ctx, _) = seeded_context(clock).await;
    let routes = auth_routes(ctx).recover(handle_rejection);

    let wrong_password = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({
            "email": "frida@example.com",
            "password": "not-the-password"
        }))
        .reply(&routes)
        .await;

    let unknown_email = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "whatever-here"
        }))
        .reply(&routes)
        .await;

    // Both failure modes must be indistinguishable on the wire
    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_email.status(), 401);
    assert_eq!(wrong_password.body(), unknown_email.body());
}

#[tokio::test]
async fn test_protected_route_rejections() {
    let clock = Arc::new(ManualClock::starting_now());
    let (ctx, account) = seeded_context(clock.clone()).await;

    let protected = warp::path!("api" / "whoami")
        .and(warp::get())
        .and(with_principal(ctx.tokens.clone()))
        .map(|principal: ledger_gate::auth::Principal| warp::reply::json(&principal))
        .recover(handle_rejection);

    // No header
    let res = warp::test::request()
        .method("GET")
        .path("/api/whoami")
        .reply(&protected)
        .await;
    assert_eq!(res.status(), 401);

    // Malformed header
    let res = warp::test::request()
        .method("GET")
        .path("/api/whoami")
        .header("authorization", "Token abc123")
        .reply(&protected)
        .await;
    assert_eq!(res.status(), 401);

    // Garbage token
    let res = warp::test::request()
        .method("GET")
        .path("/api/whoami")
        .header("authorization", "Bearer not.a.jwt")
        .reply(&protected)
        .await;
    assert_eq!(res.status(), 401);

    // Valid token
    let token = ctx.tokens.issue(&account).unwrap();
    let res = warp::test::request()
        .method("GET")
        .path("/api/whoami")
        .header("authorization", format!("Bearer {}", token))
        .reply(&protected)
        .await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body["id"].as_str().unwrap(), account.id);

    // Same token after expiry
    clock.advance(chrono::Duration::hours(9));
    let res = warp::test::request()
        .method("GET")
        .path("/api/whoami")
        .header("authorization", format!("Bearer {}", token))
        .reply(&protected)
        .await;
    assert_eq!(res.status(), 401);
}
