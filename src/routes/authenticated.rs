use super::{CHANGE_PASSWORD, RouteEntry};

/// Authenticated Route Group
///
/// Pages requiring a validated session. Every entry here relies on the guard
/// evaluating `requires_auth` before the page is reached, so an anonymous
/// visitor is bounced to the login page instead of seeing protected state.
///
/// The change-password page sits in this group on purpose: an anonymous visitor
/// hitting it must be sent to login first, which is exactly what the guard's
/// check ordering guarantees.
pub fn authenticated_routes() -> Vec<RouteEntry> {
    let entry = |path, name| RouteEntry {
        path,
        name,
        requires_auth: true,
    };

    vec![
        // Account pages.
        entry("/admin", "admin"),
        entry("/profile", "profile"),
        entry(CHANGE_PASSWORD, "change_password"),
        entry("/users/new", "user_create"),
        // Team management.
        entry("/teams", "teams"),
        entry("/teams/new", "team_create"),
        entry("/teams/:id/edit", "team_edit"),
        // Pool management.
        entry("/pools", "pools"),
        entry("/pools/new", "pool_create"),
        entry("/pools/:id/edit", "pool_edit"),
        // Player management.
        entry("/players", "players"),
        entry("/players/new", "player_create"),
        entry("/players/:id/edit", "player_edit"),
        // Match planning.
        entry("/matches", "matches"),
    ]
}
