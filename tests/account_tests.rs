use std::sync::Arc;

use tournament_console::{
    AccountService, GatewayError, GuardDecision, MemorySessionStore, Outcome, RouteGuard, Session,
    SessionStore,
    gateway::MockApiGateway,
    models::UserRecord,
    routes::{CHANGE_PASSWORD, HOME, LOGIN, RouteTable},
};

// --- Test Fixtures ---

fn player(must_change_password: bool) -> UserRecord {
    UserRecord {
        id: 11,
        email: "coach@tournament.example".to_string(),
        is_admin: false,
        is_active: true,
        must_change_password,
        created_at: None,
    }
}

fn service(gateway: MockApiGateway) -> (AccountService, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let session = Session::new(store.clone());
    (AccountService::new(session, Arc::new(gateway)), store)
}

// --- Login ---

#[tokio::test]
async fn login_establishes_the_session_and_goes_home() {
    let (mut account, store) = service(MockApiGateway::new(player(false)));

    let destination = account.login("coach@tournament.example", "pw").await.unwrap();

    assert_eq!(destination, HOME);
    assert!(account.session().is_authenticated());
    assert!(store.get("credential").is_some());
    assert!(store.get("user").is_some());
}

#[tokio::test]
async fn login_with_pending_change_goes_to_the_change_password_page() {
    let (mut account, _) = service(MockApiGateway::new(player(true)));

    let destination = account.login("coach@tournament.example", "pw").await.unwrap();

    assert_eq!(destination, CHANGE_PASSWORD);
    assert!(account.session().must_change_password());
}

#[tokio::test]
async fn rejected_login_leaves_the_session_anonymous() {
    let (mut account, store) = service(MockApiGateway::new_rejecting());

    let err = account
        .login("coach@tournament.example", "wrong")
        .await
        .unwrap_err();

    match err {
        GatewayError::InvalidCredentials {
            attempts_remaining, ..
        } => assert_eq!(attempts_remaining, Some(4)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!account.session().is_authenticated());
    assert!(store.get("credential").is_none());
}

// --- Logout ---

#[tokio::test]
async fn logout_clears_the_session_and_routes_to_login() {
    let (mut account, store) = service(MockApiGateway::new(player(false)));
    account.login("coach@tournament.example", "pw").await.unwrap();

    let destination = account.logout().await;

    assert_eq!(destination, LOGIN);
    assert!(!account.session().is_authenticated());
    assert!(store.get("credential").is_none());
    assert!(store.get("user").is_none());
}

// The server call is best-effort: a backend that already rejects the token
// must not keep the client signed in.
#[tokio::test]
async fn logout_clears_even_when_the_server_call_fails() {
    let (mut account, store) = service(MockApiGateway::new(player(false)));
    account.login("coach@tournament.example", "pw").await.unwrap();

    // Swap in an expired gateway under the established session.
    let session_store = store.clone();
    let mut account = AccountService::new(
        {
            let mut session = Session::new(session_store);
            session.restore_from_storage();
            session
        },
        Arc::new(MockApiGateway::new_expired(player(false))),
    );

    let destination = account.logout().await;

    assert_eq!(destination, LOGIN);
    assert!(!account.session().is_authenticated());
    assert!(store.get("credential").is_none());
}

// --- Password Change ---

#[tokio::test]
async fn change_password_refreshes_the_user_and_drops_the_flag() {
    let (mut account, _) = service(MockApiGateway::new(player(true)));
    account.login("coach@tournament.example", "pw").await.unwrap();
    assert!(account.session().must_change_password());

    let outcome = account
        .change_password("pw", "new-pw", "new-pw")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::RedirectTo(HOME));
    assert!(!account.session().must_change_password());

    // After the flag drops, the guard no longer allows the change page.
    let guard = RouteGuard::new(RouteTable::standard());
    assert_eq!(
        guard.check(account.session_mut(), CHANGE_PASSWORD),
        GuardDecision::Redirect(HOME)
    );
}

#[tokio::test]
async fn change_password_without_a_session_routes_to_login() {
    let (mut account, _) = service(MockApiGateway::new(player(false)));

    let outcome = account
        .change_password("pw", "new-pw", "new-pw")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::RedirectTo(LOGIN));
}

// --- Session Expiry (Gateway 401) ---

// The expiry signal is consumed here, not surfaced: the session is cleared,
// both durable entries vanish, and the caller gets a login redirect.
#[tokio::test]
async fn expired_credential_during_refresh_invalidates_the_session() {
    let store = Arc::new(MemorySessionStore::new());
    let mut seeding = Session::new(store.clone());
    seeding.establish(
        tournament_console::models::Credential::bearer("stale"),
        player(false),
    );

    let mut account = AccountService::new(
        {
            let mut session = Session::new(store.clone());
            session.restore_from_storage();
            session
        },
        Arc::new(MockApiGateway::new_expired(player(false))),
    );

    let outcome = account.refresh_profile().await.unwrap();

    assert_eq!(outcome, Outcome::RedirectTo(LOGIN));
    assert!(!account.session().is_authenticated());
    assert!(store.get("credential").is_none());
    assert!(store.get("user").is_none());

    // The next guard check lands on the login page.
    let guard = RouteGuard::new(RouteTable::standard());
    assert_eq!(
        guard.check(account.session_mut(), "/teams"),
        GuardDecision::Redirect(LOGIN)
    );
}

#[tokio::test]
async fn expired_credential_during_change_password_invalidates_the_session() {
    let store = Arc::new(MemorySessionStore::new());
    let mut seeding = Session::new(store.clone());
    seeding.establish(
        tournament_console::models::Credential::bearer("stale"),
        player(true),
    );

    let mut account = AccountService::new(
        {
            let mut session = Session::new(store.clone());
            session.restore_from_storage();
            session
        },
        Arc::new(MockApiGateway::new_expired(player(true))),
    );

    let outcome = account
        .change_password("pw", "new-pw", "new-pw")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::RedirectTo(LOGIN));
    assert!(!account.session().is_authenticated());
}

// --- Profile Refresh ---

#[tokio::test]
async fn refresh_replaces_the_user_wholesale() {
    let gateway = MockApiGateway::new(player(false));
    let (mut account, _) = service(gateway);
    account.login("coach@tournament.example", "pw").await.unwrap();

    let outcome = account.refresh_profile().await.unwrap();

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(account.session().current_user(), Some(&player(false)));
}
