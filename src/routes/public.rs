use super::{HOME, LOGIN, RouteEntry};

/// Public Route Group
///
/// Pages reachable without a session. Kept deliberately small: everything an
/// anonymous visitor can see is the landing page and the login form.
pub fn public_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry {
            path: HOME,
            name: "home",
            requires_auth: false,
        },
        RouteEntry {
            path: LOGIN,
            name: "login",
            requires_auth: false,
        },
    ]
}
