//! Client-side session cache
//!
//! Persists the most recently issued bearer token and exposes an
//! authenticated-principal view to the rest of a client application without
//! contacting the server. Claims are decoded WITHOUT signature verification
//! here - the server remains authoritative for every actual mutation, and
//! nothing in this module may gate access to a protected resource.

use std::sync::{Arc, Mutex};

use crate::auth::principal::Principal;
use crate::auth::token::{decode_unverified, Claims};
use crate::clock::Clock;

/// Where the client keeps its token between runs
///
/// The browser original used localStorage; native clients plug in whatever
/// they have. The in-memory implementation is enough for tests and tools.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Token store held in process memory
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().expect("token store poisoned").clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().expect("token store poisoned") = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().expect("token store poisoned") = None;
    }
}

/// Client session state derived from the persisted token
pub struct SessionCache {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    current: Mutex<Option<(String, Claims)>>,
}

impl SessionCache {
    /// Build the cache and load whatever token the store holds, discarding
    /// it immediately if its claims are already expired.
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        let cache = Self {
            store,
            clock,
            current: Mutex::new(None),
        };
        cache.refresh();
        cache
    }

    /// Local-only re-read and re-decode of the stored token.
    ///
    /// Known limitation: this cannot extend validity or observe server-side
    /// account changes (role change, disabled account). True revalidation
    /// would need a server round trip, which this design deliberately omits.
    pub fn refresh(&self) {
        let loaded = self.store.load().and_then(|token| {
            let claims = decode_unverified(&token)?;
            if claims.exp <= self.clock.now().timestamp() {
                return None;
            }
            Some((token, claims))
        });

        if loaded.is_none() {
            // Stale or undecodable tokens are dropped from persistence too
            self.store.clear();
        }

        *self.current.lock().expect("session poisoned") = loaded;
    }

    /// Store a freshly issued token, replacing any previous one
    pub fn on_login(&self, token: &str) {
        self.store.save(token);
        self.refresh();
    }

    /// Discard the session unconditionally; no server call is made because
    /// stateless tokens have nothing to revoke server-side.
    pub fn logout(&self) {
        self.store.clear();
        *self.current.lock().expect("session poisoned") = None;
    }

    /// The cached identity, if a live token is held
    pub fn current_principal(&self) -> Option<Principal> {
        self.current
            .lock()
            .expect("session poisoned")
            .as_ref()
            .map(|(_, claims)| claims.principal())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.lock().expect("session poisoned").is_some()
    }

    /// The raw token for the Authorization header of outbound requests
    pub fn token(&self) -> Option<String> {
        self.current
            .lock()
            .expect("session poisoned")
            .as_ref()
            .map(|(token, _)| token.clone())
    }
}
