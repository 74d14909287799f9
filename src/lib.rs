use std::sync::Arc;

// --- Module Structure ---

// Core session components.
pub mod account;
pub mod config;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod session;
pub mod storage;

// Route table, segregated into public and authenticated groups.
pub mod routes;

// --- Public Re-exports ---

// Makes the core types easily accessible to the binary entry point.
pub use account::{AccountService, Outcome};
pub use config::{AppConfig, Env};
pub use gateway::{ApiGateway, GatewayError, GatewayState, HttpApiGateway};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use session::Session;
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreState};

/// create_console
///
/// Assembles the session core from a loaded configuration: file-backed durable
/// store, HTTP gateway, session, account service, and the route guard over the
/// standard route table. The returned pair is everything a front end needs:
/// the account service for the credential-mutating flows, the guard for every
/// navigation check.
pub fn create_console(config: &AppConfig) -> (AccountService, RouteGuard) {
    let store: SessionStoreState = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let gateway: GatewayState = Arc::new(HttpApiGateway::new(config.api_base_url.clone()));

    let mut session = Session::new(store);
    // Hydrate once at assembly so the first guard check starts from the
    // persisted state rather than a transient anonymous session.
    session.restore_from_storage();

    let account = AccountService::new(session, gateway);
    let guard = RouteGuard::new(routes::RouteTable::standard());

    (account, guard)
}
