use std::sync::Arc;

use tournament_console::{
    GuardDecision, GuardState, MemorySessionStore, RouteGuard, Session,
    models::{Credential, UserRecord},
    routes::{CHANGE_PASSWORD, HOME, LOGIN, RouteTable},
};

// --- Test Fixtures ---

fn guard() -> RouteGuard {
    RouteGuard::new(RouteTable::standard())
}

/// A session over a store seeded with a credential and the given user flags,
/// as if a previous run had signed in and persisted its state.
fn stored_session(must_change_password: bool) -> Session {
    let store = MemorySessionStore::new();
    let credential = Credential::bearer("stored-token");
    let user = UserRecord {
        id: 7,
        email: "referee@tournament.example".to_string(),
        is_admin: false,
        is_active: true,
        must_change_password,
        created_at: None,
    };
    store.seed("credential", &serde_json::to_string(&credential).unwrap());
    store.seed("user", &serde_json::to_string(&user).unwrap());
    Session::new(Arc::new(store))
}

fn empty_session() -> Session {
    Session::new(Arc::new(MemorySessionStore::new()))
}

// --- Anonymous State ---

#[test]
fn empty_storage_navigating_to_admin_redirects_to_login() {
    let mut session = empty_session();
    assert_eq!(
        guard().check(&mut session, "/admin"),
        GuardDecision::Redirect(LOGIN)
    );
}

#[test]
fn anonymous_may_visit_public_pages() {
    let mut session = empty_session();
    let guard = guard();
    assert_eq!(guard.check(&mut session, HOME), GuardDecision::Allow);
    assert_eq!(guard.check(&mut session, LOGIN), GuardDecision::Allow);
}

#[test]
fn anonymous_is_redirected_from_every_protected_page() {
    let guard = guard();
    let mut session = empty_session();
    for entry in guard.table().entries() {
        if entry.requires_auth {
            // Substitute a concrete id for parameterized edit pages.
            let path = entry.path.replace(":id", "42");
            assert_eq!(
                guard.check(&mut session, &path),
                GuardDecision::Redirect(LOGIN),
                "page {} leaked past the guard",
                entry.path
            );
        }
    }
}

#[test]
fn unknown_paths_fail_closed_for_anonymous_visitors() {
    let mut session = empty_session();
    assert_eq!(
        guard().check(&mut session, "/no-such-page"),
        GuardDecision::Redirect(LOGIN)
    );
}

// The auth-required check must win over the must-change handling: the
// change-password page itself is protected, so an anonymous visitor lands on
// the login form, never inside the forced-change flow.
#[test]
fn anonymous_on_change_password_page_goes_to_login() {
    let mut session = empty_session();
    assert_eq!(
        guard().check(&mut session, CHANGE_PASSWORD),
        GuardDecision::Redirect(LOGIN)
    );
}

// --- Authenticated State ---

#[test]
fn authenticated_user_may_visit_protected_pages() {
    let guard = guard();
    let mut session = stored_session(false);
    assert_eq!(guard.check(&mut session, "/profile"), GuardDecision::Allow);
    assert_eq!(guard.check(&mut session, "/teams"), GuardDecision::Allow);
    assert_eq!(
        guard.check(&mut session, "/players/9/edit"),
        GuardDecision::Allow
    );
}

#[test]
fn authenticated_user_on_login_page_is_sent_home() {
    let mut session = stored_session(false);
    assert_eq!(
        guard().check(&mut session, LOGIN),
        GuardDecision::Redirect(HOME)
    );
}

#[test]
fn change_password_page_is_unreachable_without_pending_change() {
    let mut session = stored_session(false);
    assert_eq!(
        guard().check(&mut session, CHANGE_PASSWORD),
        GuardDecision::Redirect(HOME)
    );
}

// --- Forced Password Change State ---

#[test]
fn pending_change_pins_navigation_to_the_change_password_page() {
    let guard = guard();
    let mut session = stored_session(true);
    assert_eq!(
        guard.check(&mut session, HOME),
        GuardDecision::Redirect(CHANGE_PASSWORD)
    );
    assert_eq!(
        guard.check(&mut session, "/teams"),
        GuardDecision::Redirect(CHANGE_PASSWORD)
    );
    assert_eq!(
        guard.check(&mut session, CHANGE_PASSWORD),
        GuardDecision::Allow
    );
}

#[test]
fn pending_change_on_login_page_goes_to_change_password() {
    let mut session = stored_session(true);
    assert_eq!(
        guard().check(&mut session, LOGIN),
        GuardDecision::Redirect(CHANGE_PASSWORD)
    );
}

// --- State Derivation ---

#[test]
fn guard_state_is_derived_from_the_session() {
    let mut anonymous = empty_session();
    anonymous.restore_from_storage();
    assert_eq!(GuardState::of(&anonymous), GuardState::Anonymous);

    let mut authenticated = stored_session(false);
    authenticated.restore_from_storage();
    assert_eq!(GuardState::of(&authenticated), GuardState::Authenticated);

    let mut pending = stored_session(true);
    pending.restore_from_storage();
    assert_eq!(GuardState::of(&pending), GuardState::AuthenticatedMustChange);
}

// A check re-hydrates from storage first, so state persisted by a "previous
// run" is honored even though the in-memory session starts empty.
#[test]
fn check_rehydrates_before_deciding() {
    let mut session = stored_session(true);
    assert!(!session.is_authenticated());
    assert_eq!(
        guard().check(&mut session, HOME),
        GuardDecision::Redirect(CHANGE_PASSWORD)
    );
    assert!(session.is_authenticated());
}
