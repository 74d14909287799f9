use uuid::Uuid;

/// Route Table Index
///
/// Organizes the console's navigable pages into security-segregated modules.
/// The split mirrors the access model: `public` pages are reachable by an
/// anonymous visitor, `authenticated` pages require a live session. The guard
/// only ever consumes the `requires_auth` boolean from an entry; the rest of
/// the entry belongs to the view layer.

/// Pages accessible to all visitors (home, login).
pub mod public;

/// Pages requiring a validated session (admin, profile, entity management).
pub mod authenticated;

// Well-known destinations used by the guard's redirect decisions.
pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const CHANGE_PASSWORD: &str = "/change-password";

/// RouteEntry
///
/// One navigable page. `path` may contain `:param` segments for edit pages.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

/// RouteIntent
///
/// One navigation attempt, resolved against the route table. Ephemeral: built
/// per check and dropped after the guard decides. The navigation id exists
/// solely to correlate the log lines of a single check.
#[derive(Debug, Clone)]
pub struct RouteIntent {
    pub target: String,
    pub requires_auth: bool,
    pub navigation_id: Uuid,
}

/// RouteTable
///
/// The full set of navigable pages, assembled from the public and
/// authenticated groups.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// standard
    ///
    /// Assembles the console's complete route table.
    pub fn standard() -> Self {
        let mut entries = public::public_routes();
        entries.extend(authenticated::authenticated_routes());
        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// intent
    ///
    /// Resolves a concrete target path into a RouteIntent. Paths that match no
    /// entry are treated as `requires_auth = true`: an unknown page fails
    /// closed rather than leaking past the guard.
    pub fn intent(&self, target: &str) -> RouteIntent {
        let requires_auth = self
            .entries
            .iter()
            .find(|e| path_matches(e.path, target))
            .map(|e| e.requires_auth)
            .unwrap_or(true);

        RouteIntent {
            target: target.to_string(),
            requires_auth,
            navigation_id: Uuid::new_v4(),
        }
    }
}

/// path_matches
///
/// Segment-wise comparison of a route pattern against a concrete path.
/// A `:param` segment matches any single non-empty segment.
fn path_matches(pattern: &str, target: &str) -> bool {
    let pattern_segs: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let target_segs: Vec<&str> = target.trim_matches('/').split('/').collect();

    if pattern_segs.len() != target_segs.len() {
        return false;
    }

    pattern_segs
        .iter()
        .zip(&target_segs)
        .all(|(p, t)| p.starts_with(':') && !t.is_empty() || p == t)
}
