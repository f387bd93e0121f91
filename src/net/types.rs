//! Wire types shared with the identity service.

use serde::{Deserialize, Serialize};

/// A user profile as returned by the identity service.
///
/// Treated as an immutable value: a transition replaces the whole
/// profile, never a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-assigned identifier; upstream emits Mongo-style `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_owned()
}

/// Successful login/signup payload: a bearer token plus the profile it
/// belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Password-change payload. The server may rotate the token; when it
/// does not, the caller keeps using the old one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRefresh {
    pub token: Option<String>,
    pub user: UserProfile,
}

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// The `{status, token?, data?: {user}, message?}` envelope every
/// identity endpoint responds with.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<EnvelopeData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeData {
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl ApiEnvelope {
    /// The user object carried in `data`, if any.
    #[must_use]
    pub fn into_user(self) -> Option<UserProfile> {
        self.data.and_then(|d| d.user)
    }

    /// Extract a token + user pair (login/signup responses).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if either half is missing — the
    /// session layer never accepts a token without a matching user.
    pub fn into_auth_session(self) -> Result<AuthSession, ApiError> {
        let token = self
            .token
            .ok_or_else(|| ApiError::Decode("response is missing a token".to_owned()))?;
        let user = self
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| ApiError::Decode("response is missing a user object".to_owned()))?;
        Ok(AuthSession { token, user })
    }

    /// Extract a password-change payload: user required, token optional.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the user object is missing.
    pub fn into_credential_refresh(self) -> Result<CredentialRefresh, ApiError> {
        let token = self.token;
        let user = self
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| ApiError::Decode("response is missing a user object".to_owned()))?;
        Ok(CredentialRefresh { token, user })
    }
}

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Failure kinds surfaced by the identity client. Nothing at this
/// boundary panics or throws; every operation returns one of these.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, connection reset, timed out. The session is
    /// preserved; the error is transient from the caller's view.
    #[error("network error: {0}")]
    Transport(String),
    /// The server explicitly rejected the credential or token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// A well-formed error response (e.g. duplicate email on signup).
    /// Surfaced verbatim; no session state changes.
    #[error("server error: {0}")]
    Server(String),
    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    Decode(String),
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
