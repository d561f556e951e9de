use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use ledger_gate::auth::credentials::hash_password;
use ledger_gate::auth::role::Role;
use ledger_gate::clock::SystemClock;
use ledger_gate::config::ServerConfig;
use ledger_gate::handlers::{auth_routes, handle_rejection, AuthContext};
use ledger_gate::notify::LogNotifier;
use ledger_gate::security_logger::init_security_logger;
use ledger_gate::store::{Account, MemoryUserStore, UserStore};

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();
    init_security_logger();

    // Load config from .env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}h, reset_ttl={}min",
        config.host, config.port, config.token_ttl_hours, config.reset_ttl_minutes
    );

    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    if let Err(e) = seed_admin_account(store.as_ref()).await {
        error!("Failed to seed admin account: {}", e);
        std::process::exit(1);
    }

    let ctx = AuthContext::from_config(
        &config,
        store,
        Arc::new(LogNotifier),
        Arc::new(SystemClock),
    );

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = auth_routes(ctx)
        .or(health_route)
        .recover(handle_rejection);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Ledger Gate server on {}", addr);

    warp::serve(routes).run(addr).await;
}

/// Seed the initial admin from LEDGER_GATE_ADMIN_EMAIL/_PASSWORD.
///
/// Account creation is otherwise an administrative CRUD concern outside
/// this core; without a seeded admin a fresh in-memory store would be
/// unusable.
async fn seed_admin_account(store: &dyn UserStore) -> ledger_gate::Result<()> {
    let email = match std::env::var("LEDGER_GATE_ADMIN_EMAIL") {
        Ok(email) => email,
        Err(_) => {
            warn!("LEDGER_GATE_ADMIN_EMAIL not set; starting with an empty user store");
            return Ok(());
        }
    };
    let password = std::env::var("LEDGER_GATE_ADMIN_PASSWORD").map_err(|_| {
        ledger_gate::LedgerGateError::ConfigError(
            "LEDGER_GATE_ADMIN_PASSWORD is required when LEDGER_GATE_ADMIN_EMAIL is set"
                .to_string(),
        )
    })?;

    let account = Account::new("Administrator", &email, hash_password(&password)?, Role::Admin);
    store.save(account).await?;
    info!("Seeded admin account for {}", email);
    Ok(())
}
