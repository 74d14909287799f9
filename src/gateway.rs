use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::models::{
    ApiErrorBody, ChangePasswordRequest, Credential, LoginRequest, LoginResponse, UserRecord,
};

/// GatewayError
///
/// The typed failure taxonomy of the API boundary. Auth-required and forced
/// password change are guard decisions and never appear here; `SessionExpired`
/// is the one navigation-relevant failure and is consumed by the account
/// layer, which owns the clear-and-redirect reaction.
/// The gateway itself is pure transport and performs no session side effects.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP 401: the credential is no longer accepted by the backend.
    #[error("session expired")]
    SessionExpired,

    /// HTTP 400 on login: wrong email/password. Carries the backend's
    /// remaining-attempts counter when present, for display next to the form.
    #[error("login rejected: {message}")]
    InvalidCredentials {
        message: String,
        attempts_remaining: Option<u32>,
    },

    /// HTTP 403: account temporarily locked out or deactivated.
    #[error("access refused: {message}")]
    Forbidden {
        message: String,
        minutes_remaining: Option<u32>,
    },

    /// Any other non-success response.
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Connection-level failure (DNS, refused, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

// 1. ApiGateway Contract
/// ApiGateway
///
/// Defines the abstract contract for every backend call the session core
/// makes. The trait allows swapping the concrete implementation—from the real
/// HTTP client (HttpApiGateway) in the running console to the in-memory mock
/// (MockApiGateway) in tests—without affecting the account layer.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Exchanges credentials for a bearer token plus the full user record.
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Credential, UserRecord), GatewayError>;

    /// Notifies the backend of the logout. Token removal is client-side, so
    /// callers treat a failure here as non-fatal.
    async fn logout(&self, credential: &Credential) -> Result<(), GatewayError>;

    /// Changes the signed-in user's password. On success the backend drops the
    /// forced-change flag; callers re-fetch the user to observe that.
    async fn change_password(
        &self,
        credential: &Credential,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError>;

    /// Fetches one user record by id (profile refresh).
    async fn fetch_user(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<UserRecord, GatewayError>;
}

/// GatewayState
///
/// The concrete type used to share gateway access across the session core.
pub type GatewayState = Arc<dyn ApiGateway>;

// 2. The Real Implementation (HTTP)
/// HttpApiGateway
///
/// The concrete implementation over the tournament backend's REST API, built
/// on a shared `reqwest::Client`. All paths are relative to the configured
/// base URL (which includes the API version prefix).
#[derive(Clone)]
pub struct HttpApiGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(credential: &Credential) -> String {
        format!("Bearer {}", credential.access_token)
    }

    /// error_for
    ///
    /// Maps a non-success response to the typed taxonomy. The backend wraps
    /// its detail either as a plain string or as a structured object with a
    /// message and counters; both forms are handled.
    async fn error_for(status: StatusCode, response: reqwest::Response) -> GatewayError {
        let raw: serde_json::Value = response.json().await.unwrap_or_default();
        let detail = raw.get("detail").cloned().unwrap_or_default();

        let body: ApiErrorBody = match &detail {
            serde_json::Value::String(s) => ApiErrorBody {
                message: Some(s.clone()),
                ..Default::default()
            },
            other => serde_json::from_value(other.clone()).unwrap_or_default(),
        };

        let message = body
            .message
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        match status {
            StatusCode::UNAUTHORIZED => GatewayError::SessionExpired,
            StatusCode::BAD_REQUEST => GatewayError::InvalidCredentials {
                message,
                attempts_remaining: body.attempts_remaining,
            },
            StatusCode::FORBIDDEN => GatewayError::Forbidden {
                message,
                minutes_remaining: body.minutes_remaining,
            },
            _ => GatewayError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_for(status, response).await)
        }
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Credential, UserRecord), GatewayError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&request)
            .send()
            .await?;

        let body: LoginResponse = Self::ensure_success(response).await?.json().await?;

        let credential = Credential {
            access_token: body.access_token,
            token_type: body.token_type,
        };

        Ok((credential, body.user))
    }

    async fn logout(&self, credential: &Credential) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .header(reqwest::header::AUTHORIZATION, Self::bearer(credential))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn change_password(
        &self,
        credential: &Credential,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/change-password"))
            .header(reqwest::header::AUTHORIZATION, Self::bearer(credential))
            .json(request)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_user(
        &self,
        credential: &Credential,
        id: i64,
    ) -> Result<UserRecord, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/users/{id}")))
            .header(reqwest::header::AUTHORIZATION, Self::bearer(credential))
            .send()
            .await?;

        let user: UserRecord = Self::ensure_success(response).await?.json().await?;
        Ok(user)
    }
}

// 3. The Mock Implementation (For Tests)
/// MockApiGateway
///
/// An in-memory gateway used by the account-flow tests. Holds one user record
/// behind a mutex so that a successful `change_password` is observable through
/// the subsequent `fetch_user`, exactly like the real backend.
pub struct MockApiGateway {
    user: Mutex<UserRecord>,
    token: String,
    /// When true, every authenticated call answers with `SessionExpired`.
    pub expired: bool,
    /// When true, `login` answers with `InvalidCredentials`.
    pub reject_login: bool,
}

impl MockApiGateway {
    pub fn new(user: UserRecord) -> Self {
        Self {
            user: Mutex::new(user),
            token: "mock-token".to_string(),
            expired: false,
            reject_login: false,
        }
    }

    pub fn new_expired(user: UserRecord) -> Self {
        Self {
            expired: true,
            ..Self::new(user)
        }
    }

    pub fn new_rejecting() -> Self {
        Self {
            reject_login: true,
            ..Self::new(UserRecord::default())
        }
    }
}

#[async_trait]
impl ApiGateway for MockApiGateway {
    async fn login(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<(Credential, UserRecord), GatewayError> {
        if self.reject_login {
            return Err(GatewayError::InvalidCredentials {
                message: "invalid email or password".to_string(),
                attempts_remaining: Some(4),
            });
        }
        Ok((
            Credential::bearer(self.token.as_str()),
            self.user.lock().unwrap().clone(),
        ))
    }

    async fn logout(&self, _credential: &Credential) -> Result<(), GatewayError> {
        if self.expired {
            return Err(GatewayError::SessionExpired);
        }
        Ok(())
    }

    async fn change_password(
        &self,
        _credential: &Credential,
        _request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        if self.expired {
            return Err(GatewayError::SessionExpired);
        }
        self.user.lock().unwrap().must_change_password = false;
        Ok(())
    }

    async fn fetch_user(
        &self,
        _credential: &Credential,
        _id: i64,
    ) -> Result<UserRecord, GatewayError> {
        if self.expired {
            return Err(GatewayError::SessionExpired);
        }
        Ok(self.user.lock().unwrap().clone())
    }
}
