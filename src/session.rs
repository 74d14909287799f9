use crate::models::{Credential, UserRecord};
use crate::storage::{CREDENTIAL_KEY, SessionStoreState, USER_KEY};

/// Session
///
/// The single owner of the client-side authentication state: the opaque
/// credential and the current user record, mirrored into the durable store so
/// a process restart reconstructs the same state.
///
/// Invariant: the credential is present iff a login succeeded and has not been
/// invalidated (logout or a session-expired signal from the gateway). The user
/// record is only ever replaced wholesale—on login and on profile refresh—never
/// field-patched.
///
/// The session is an explicitly owned, injectable object rather than ambient
/// global state: the guard and the account actions receive a reference to it,
/// which keeps every flow testable without a live UI runtime.
pub struct Session {
    store: SessionStoreState,
    credential: Option<Credential>,
    current_user: Option<UserRecord>,
}

impl Session {
    /// new
    ///
    /// Creates an empty (anonymous) session over the given durable store.
    /// Callers that want persisted state back must call `restore_from_storage`.
    pub fn new(store: SessionStoreState) -> Self {
        Self {
            store,
            credential: None,
            current_user: None,
        }
    }

    // --- Derived Flags ---

    /// True iff a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// True iff a user record is present and carries the admin flag.
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// True iff a user record is present and its forced-password-change flag
    /// is set.
    pub fn must_change_password(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.must_change_password)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current_user.as_ref()
    }

    // --- State Transitions ---

    /// restore_from_storage
    ///
    /// Re-hydrates the credential and user record from the durable store.
    /// Idempotent and cheap (no network): the guard calls this before every
    /// navigation check so that a full reload reconstructs the correct state
    /// before the first decision runs. Missing or corrupt entries resolve to
    /// an absent value, which defaults the session to anonymous.
    pub fn restore_from_storage(&mut self) {
        self.credential = self
            .store
            .get(CREDENTIAL_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok());

        self.current_user = self
            .store
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok());
    }

    /// establish
    ///
    /// Installs a freshly issued credential and user record after a successful
    /// login, writing both through to the durable store.
    pub fn establish(&mut self, credential: Credential, user: UserRecord) {
        self.persist(CREDENTIAL_KEY, &credential);
        self.persist(USER_KEY, &user);
        self.credential = Some(credential);
        self.current_user = Some(user);
        tracing::info!(user = %self.current_user.as_ref().map(|u| u.email.as_str()).unwrap_or(""),
            "session established");
    }

    /// replace_user
    ///
    /// Wholesale replacement of the user record (profile refresh, or the
    /// post-password-change reload). The credential is untouched.
    pub fn replace_user(&mut self, user: UserRecord) {
        self.persist(USER_KEY, &user);
        self.current_user = Some(user);
    }

    /// clear
    ///
    /// Wipes the in-memory state and removes both durable entries. Used on
    /// logout and on forced invalidation (gateway 401).
    pub fn clear(&mut self) {
        self.credential = None;
        self.current_user = None;
        self.store.remove(CREDENTIAL_KEY);
        self.store.remove(USER_KEY);
        tracing::info!("session cleared");
    }

    fn persist<T: serde::Serialize>(&self, key: &str, value: &T) {
        // Serialization of our own records cannot fail; guard anyway so a
        // storage write never panics the navigation path.
        match serde_json::to_string(value) {
            Ok(raw) => self.store.put(key, &raw),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize session entry"),
        }
    }
}
