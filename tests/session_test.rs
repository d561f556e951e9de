use std::sync::Arc;

use chrono::Duration;

use ledger_gate::auth::role::Role;
use ledger_gate::auth::token::TokenManager;
use ledger_gate::clock::ManualClock;
use ledger_gate::session::{MemoryTokenStore, SessionCache, TokenStore};
use ledger_gate::store::Account;

const TEST_SECRET: &str = "integration-test-signing-key-42!!";

fn issue_token(clock: Arc<ManualClock>) -> (String, Account) {
    let manager = TokenManager::new(TEST_SECRET, Duration::hours(8), clock);
    let account = Account::new(
        "Sam",
        "sam@example.com",
        "unused-hash".to_string(),
        Role::Viewer,
    );
    (manager.issue(&account).unwrap(), account)
}

#[test]
fn test_load_live_token_exposes_principal() {
    let clock = Arc::new(ManualClock::starting_now());
    let (token, account) = issue_token(clock.clone());

    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    store.save(&token);

    let session = SessionCache::new(store, clock);
    assert!(session.is_authenticated());

    let principal = session.current_principal().unwrap();
    assert_eq!(principal.id, account.id);
    assert_eq!(principal.role, Role::Viewer);
    assert_eq!(session.token().as_deref(), Some(token.as_str()));
}

#[test]
fn test_expired_token_discarded_on_load() {
    let clock = Arc::new(ManualClock::starting_now());
    let (token, _) = issue_token(clock.clone());

    let backing = Arc::new(MemoryTokenStore::new());
    backing.save(&token);

    clock.advance(Duration::hours(9));
    let session = SessionCache::new(backing.clone(), clock);

    assert!(!session.is_authenticated());
    assert!(session.current_principal().is_none());
    // The stale token was also purged from persistence
    assert!(backing.load().is_none());
}

#[test]
fn test_undecodable_token_discarded_on_load() {
    let clock = Arc::new(ManualClock::starting_now());
    let backing = Arc::new(MemoryTokenStore::new());
    backing.save("garbage.token.value");

    let session = SessionCache::new(backing.clone(), clock);
    assert!(!session.is_authenticated());
    assert!(backing.load().is_none());
}

#[test]
fn test_login_replaces_and_logout_clears() {
    let clock = Arc::new(ManualClock::starting_now());
    let (first, _) = issue_token(clock.clone());
    let (second, _) = issue_token(clock.clone());

    let backing = Arc::new(MemoryTokenStore::new());
    let session = SessionCache::new(backing.clone(), clock);
    assert!(!session.is_authenticated());

    session.on_login(&first);
    assert_eq!(session.token().as_deref(), Some(first.as_str()));

    session.on_login(&second);
    assert_eq!(session.token().as_deref(), Some(second.as_str()));

    session.logout();
    assert!(!session.is_authenticated());
    assert!(backing.load().is_none());
}

#[test]
fn test_refresh_is_local_and_drops_expired() {
    let clock = Arc::new(ManualClock::starting_now());
    let (token, _) = issue_token(clock.clone());

    let backing = Arc::new(MemoryTokenStore::new());
    backing.save(&token);
    let session = SessionCache::new(backing, clock.clone());
    assert!(session.is_authenticated());

    // A local refresh cannot extend validity: once the clock passes exp,
    // the cached session is gone.
    clock.advance(Duration::hours(9));
    session.refresh();
    assert!(!session.is_authenticated());
}
