use crate::routes::{CHANGE_PASSWORD, HOME, LOGIN, RouteIntent, RouteTable};
use crate::session::Session;

/// GuardState
///
/// The three session states the guard can observe. Derived purely from the
/// Session at each check; the guard persists no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Anonymous,
    Authenticated,
    AuthenticatedMustChange,
}

impl GuardState {
    /// of
    ///
    /// Projects the session onto one of the three states. Always resolvable:
    /// empty or corrupt storage simply reads as Anonymous.
    pub fn of(session: &Session) -> Self {
        if !session.is_authenticated() {
            GuardState::Anonymous
        } else if session.must_change_password() {
            GuardState::AuthenticatedMustChange
        } else {
            GuardState::Authenticated
        }
    }
}

/// GuardDecision
///
/// The outcome of one navigation check. A redirect is a routing decision, not
/// an error: none of the conditions below surface to the user as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// RouteGuard
///
/// Intercepts every navigation intent and decides allow/redirect from the
/// session state and the target's `requires_auth` flag.
///
/// The check ordering is load-bearing: the anonymous-visitor check runs before
/// the forced-password-change checks, so an unauthenticated visitor is never
/// silently routed into protected app state.
pub struct RouteGuard {
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// check
    ///
    /// Runs one navigation check against the given target path. Re-hydrates
    /// the session from durable storage first, so a full process restart
    /// reconstructs the correct state before the first decision runs.
    pub fn check(&self, session: &mut Session, target: &str) -> GuardDecision {
        session.restore_from_storage();
        let intent = self.table.intent(target);
        let decision = self.decide(session, &intent);

        tracing::debug!(
            navigation_id = %intent.navigation_id,
            target = %intent.target,
            requires_auth = intent.requires_auth,
            state = ?GuardState::of(session),
            decision = ?decision,
            "navigation check"
        );

        decision
    }

    /// decide
    ///
    /// The transition table itself, evaluated top to bottom.
    fn decide(&self, session: &Session, intent: &RouteIntent) -> GuardDecision {
        let state = GuardState::of(session);

        // 1. Anonymous visitor on a protected page: always to login, before
        //    any must-change handling can run.
        if state == GuardState::Anonymous {
            if intent.requires_auth {
                return GuardDecision::Redirect(LOGIN);
            }
            return GuardDecision::Allow;
        }

        // 2. Signed-in visitor on the login page: the login form is pointless
        //    now; forward to the forced change page or home.
        if intent.target == LOGIN {
            return if state == GuardState::AuthenticatedMustChange {
                GuardDecision::Redirect(CHANGE_PASSWORD)
            } else {
                GuardDecision::Redirect(HOME)
            };
        }

        // 3. Forced password change pins every navigation to its page.
        if state == GuardState::AuthenticatedMustChange && intent.target != CHANGE_PASSWORD {
            return GuardDecision::Redirect(CHANGE_PASSWORD);
        }

        // 4. No pending change: the change-password page is not reachable
        //    directly; it only appears through the forced flow.
        if state == GuardState::Authenticated && intent.target == CHANGE_PASSWORD {
            return GuardDecision::Redirect(HOME);
        }

        GuardDecision::Allow
    }
}
