//! Identity service client — the four authenticated round trips the
//! session layer depends on, plus best-effort logout notification.
//!
//! ERROR HANDLING
//! ==============
//! Every failure mode (unreachable server, non-2xx status, malformed
//! payload) surfaces as a typed [`ApiError`]; nothing escapes this
//! boundary as a panic. 401/403 map to `Unauthorized` so the session
//! layer can tell a revoked token apart from a flaky network.

use serde_json::json;

use crate::config::ClientConfig;
use crate::net::types::{ApiEnvelope, ApiError, AuthSession, CredentialRefresh, UserProfile};

/// The remote operations the session layer needs. Implemented by
/// [`HttpIdentityClient`] in production and by scripted mocks in tests.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError>;

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<AuthSession, ApiError>;

    /// Validate a bearer token and fetch the profile it belongs to.
    /// `Ok(None)` means the server accepted the token but returned no
    /// user object; the caller keeps its cached profile.
    async fn fetch_current_user(&self, token: &str) -> Result<Option<UserProfile>, ApiError>;

    async fn update_profile(&self, token: &str, name: &str, email: &str) -> Result<UserProfile, ApiError>;

    async fn update_password(
        &self,
        token: &str,
        password_current: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<CredentialRefresh, ApiError>;

    /// Tell the server the user logged out. Fire-and-forget: failures
    /// are ignored and the local logout never waits on this.
    async fn notify_logout(&self, token: &str);
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// reqwest-backed [`IdentityApi`] speaking the `/users/*` endpoints.
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiEnvelope, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_envelope(status, &body)
    }
}

/// Map an HTTP status + body to either a success envelope or a typed
/// error. Pure so the mapping is testable without a live server.
pub(crate) fn parse_envelope(status: u16, body: &str) -> Result<ApiEnvelope, ApiError> {
    let envelope = serde_json::from_str::<ApiEnvelope>(body).ok();

    if status == 401 || status == 403 {
        let message = envelope
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("status {status}"));
        return Err(ApiError::Unauthorized(message));
    }

    if !(200..300).contains(&status) {
        let message = envelope
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("status {status}: {body}"));
        return Err(ApiError::Server(message));
    }

    let envelope = envelope.ok_or_else(|| ApiError::Decode(format!("unexpected response: {body}")))?;
    if envelope.status != "success" {
        let message = envelope.message.unwrap_or_else(|| "request failed".to_owned());
        return Err(ApiError::Server(message));
    }
    Ok(envelope)
}

#[async_trait::async_trait]
impl IdentityApi for HttpIdentityClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        tracing::debug!(email, "login request");
        let envelope = self
            .send(
                self.http
                    .post(self.endpoint("/users/login"))
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        envelope.into_auth_session()
    }

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<AuthSession, ApiError> {
        tracing::debug!(email, "signup request");
        let envelope = self
            .send(self.http.post(self.endpoint("/users/signup")).json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "passwordConfirm": password_confirm,
            })))
            .await?;
        envelope.into_auth_session()
    }

    async fn fetch_current_user(&self, token: &str) -> Result<Option<UserProfile>, ApiError> {
        let envelope = self
            .send(self.http.get(self.endpoint("/users/me")).bearer_auth(token))
            .await?;
        Ok(envelope.into_user())
    }

    async fn update_profile(&self, token: &str, name: &str, email: &str) -> Result<UserProfile, ApiError> {
        tracing::debug!(email, "profile update request");
        let envelope = self
            .send(
                self.http
                    .patch(self.endpoint("/users/updateMe"))
                    .bearer_auth(token)
                    .json(&json!({ "name": name, "email": email })),
            )
            .await?;
        envelope
            .into_user()
            .ok_or_else(|| ApiError::Decode("response is missing a user object".to_owned()))
    }

    async fn update_password(
        &self,
        token: &str,
        password_current: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<CredentialRefresh, ApiError> {
        let envelope = self
            .send(
                self.http
                    .patch(self.endpoint("/users/updateMyPassword"))
                    .bearer_auth(token)
                    .json(&json!({
                        "passwordCurrent": password_current,
                        "password": password,
                        "passwordConfirm": password_confirm,
                    })),
            )
            .await?;
        envelope.into_credential_refresh()
    }

    async fn notify_logout(&self, token: &str) {
        let result = self
            .http
            .get(self.endpoint("/users/logout"))
            .bearer_auth(token)
            .send()
            .await;
        if let Err(e) = result {
            tracing::debug!(error = %e, "logout notification failed");
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
