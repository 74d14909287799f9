use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Session Records ---

/// Credential
///
/// The opaque bearer token proving an authenticated session. The client never
/// decodes or inspects the token; it is attached verbatim to authenticated
/// requests and persisted under the `credential` storage entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Credential {
    pub access_token: String,
    // Always "bearer" as issued by the backend; kept so the Authorization
    // header can be rebuilt without hardcoding the scheme.
    pub token_type: String,
}

impl Credential {
    /// bearer
    ///
    /// Convenience constructor for a standard bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }
}

/// UserRecord
///
/// The canonical identity record for the signed-in user, replaced wholesale on
/// login and on profile refresh, never partially mutated. The authoritative
/// shape uses boolean flags (`is_admin`, `must_change_password`) rather than a
/// role string, matching the backend's user model.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    // RBAC flag: administrators see the moderation surface of the console.
    pub is_admin: bool,
    // Deactivated accounts are rejected at login by the backend; the flag is
    // carried here so the profile page can display it.
    pub is_active: bool,
    // Server-set flag forcing the user through the password-change page before
    // the rest of the console becomes reachable.
    pub must_change_password: bool,
    // Server-assigned; absent on older records.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// --- Gateway Payloads ---

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// Successful login payload: the bearer token plus the full user record, so the
/// session can be established without a second round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserRecord,
}

/// ChangePasswordRequest
///
/// Input payload for POST /auth/change-password. The confirmation field is
/// validated server-side; the client passes it through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// ApiErrorBody
///
/// The backend's structured error detail. Login rejections carry the remaining
/// attempt count before lockout; lockout responses carry the remaining minutes.
/// All fields are optional because plain-string details also occur.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub attempts_remaining: Option<u32>,
    pub minutes_remaining: Option<u32>,
}
