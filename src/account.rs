use crate::gateway::{GatewayError, GatewayState};
use crate::models::ChangePasswordRequest;
use crate::routes::{CHANGE_PASSWORD, HOME, LOGIN};
use crate::session::Session;

/// Outcome
///
/// Result of a session-mutating account action. A redirect here is a normal
/// navigation instruction for the caller, not a failure: in particular, an
/// expired session during an action resolves to `RedirectTo(login)` after the
/// session has been cleared, and is never surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    RedirectTo(&'static str),
}

/// AccountService
///
/// Owns the session and runs the credential-mutating flows against the
/// gateway: login, logout, password change, profile refresh. These are the
/// only writers of session state, and the design assumes at most one of them
/// in flight at a time (last write wins; no coordination).
///
/// This layer is also where the gateway's `SessionExpired` signal is consumed:
/// the gateway reports, the account layer clears the session and decides the
/// redirect. The transport never touches session state itself.
pub struct AccountService {
    session: Session,
    gateway: GatewayState,
}

impl AccountService {
    pub fn new(session: Session, gateway: GatewayState) -> Self {
        Self { session, gateway }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for the route guard, which re-hydrates the session
    /// before each navigation check.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// login
    ///
    /// Exchanges credentials for a session and returns the destination page:
    /// the change-password page when the server flags a forced change,
    /// otherwise home. Login rejections (wrong password, lockout, deactivated
    /// account) propagate to the caller for display next to the form.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<&'static str, GatewayError> {
        let (credential, user) = self.gateway.login(email, password).await?;
        let must_change = user.must_change_password;
        self.session.establish(credential, user);

        Ok(if must_change { CHANGE_PASSWORD } else { HOME })
    }

    /// logout
    ///
    /// Clears the session and returns the login page as destination. The
    /// server-side call is best-effort: token removal is client-side, so a
    /// failed or already-expired call still ends in a cleared session.
    pub async fn logout(&mut self) -> &'static str {
        if let Some(credential) = self.session.credential().cloned() {
            if let Err(e) = self.gateway.logout(&credential).await {
                tracing::warn!(error = %e, "logout call failed, clearing session anyway");
            }
        }
        self.session.clear();
        LOGIN
    }

    /// change_password
    ///
    /// Runs the password change and then re-fetches the user record wholesale,
    /// so the cleared forced-change flag is observed from the server rather
    /// than patched locally. Success yields a redirect home; an expired
    /// session anywhere in the flow yields a redirect to login.
    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Outcome, GatewayError> {
        let Some(credential) = self.session.credential().cloned() else {
            return Ok(Outcome::RedirectTo(LOGIN));
        };

        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        };

        match self.gateway.change_password(&credential, &request).await {
            Ok(()) => {}
            Err(GatewayError::SessionExpired) => return Ok(self.invalidated()),
            Err(e) => return Err(e),
        }

        match self.refresh_profile().await? {
            Outcome::Done => Ok(Outcome::RedirectTo(HOME)),
            redirect => Ok(redirect),
        }
    }

    /// refresh_profile
    ///
    /// Replaces the user record with the server's current view. No-op redirect
    /// to login when no session is established or when the credential has been
    /// invalidated server-side.
    pub async fn refresh_profile(&mut self) -> Result<Outcome, GatewayError> {
        let (Some(credential), Some(user)) = (
            self.session.credential().cloned(),
            self.session.current_user().cloned(),
        ) else {
            return Ok(Outcome::RedirectTo(LOGIN));
        };

        match self.gateway.fetch_user(&credential, user.id).await {
            Ok(fresh) => {
                self.session.replace_user(fresh);
                Ok(Outcome::Done)
            }
            Err(GatewayError::SessionExpired) => Ok(self.invalidated()),
            Err(e) => Err(e),
        }
    }

    /// invalidated
    ///
    /// The single reaction to a session-expired signal: wipe the session
    /// (memory and durable entries) and route to the login page.
    fn invalidated(&mut self) -> Outcome {
        tracing::info!("credential rejected by backend, invalidating session");
        self.session.clear();
        Outcome::RedirectTo(LOGIN)
    }
}
