use tournament_console::routes::{CHANGE_PASSWORD, HOME, LOGIN, RouteTable};

#[test]
fn public_pages_do_not_require_auth() {
    let table = RouteTable::standard();
    assert!(!table.intent(HOME).requires_auth);
    assert!(!table.intent(LOGIN).requires_auth);
}

#[test]
fn management_pages_require_auth() {
    let table = RouteTable::standard();
    for path in ["/admin", "/profile", CHANGE_PASSWORD, "/teams", "/pools", "/players", "/matches"] {
        assert!(table.intent(path).requires_auth, "{path} should be protected");
    }
}

#[test]
fn parameterized_edit_pages_match_concrete_ids() {
    let table = RouteTable::standard();
    assert!(table.intent("/teams/12/edit").requires_auth);
    assert!(table.intent("/pools/3/edit").requires_auth);
    assert!(table.intent("/players/abc/edit").requires_auth);
}

#[test]
fn unknown_paths_resolve_as_protected() {
    let table = RouteTable::standard();
    assert!(table.intent("/does/not/exist").requires_auth);
    // An empty id segment does not satisfy a :id pattern.
    assert!(table.intent("/teams//edit").requires_auth);
}

#[test]
fn each_intent_gets_its_own_navigation_id() {
    let table = RouteTable::standard();
    let a = table.intent(HOME);
    let b = table.intent(HOME);
    assert_ne!(a.navigation_id, b.navigation_id);
}
