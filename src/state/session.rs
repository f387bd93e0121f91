//! The authoritative session and its broadcaster.
//!
//! ARCHITECTURE
//! ============
//! Exactly one [`SessionHandle`] exists per running client. Views call
//! [`SessionHandle::current`] or [`SessionHandle::subscribe`] to read,
//! and the `login`/`signup`/`logout`/`update_*` methods to request
//! transitions. A `tokio::sync::Mutex` serializes user transitions in
//! arrival order; the one writer allowed to run concurrently is the
//! boot reconciliation (see `reconcile`), which is fenced off by the
//! sequence-number gate below.
//!
//! CONCURRENCY
//! ===========
//! Every write carries a monotonically increasing sequence number. A
//! write is discarded when a higher-numbered transition has already
//! committed, so a slow boot reconciliation can never overwrite a newer
//! user-initiated login. Snapshot writes and session publishes happen
//! under one gate lock, so subscribers never observe a half-applied
//! transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell, watch};

use crate::net::api::IdentityApi;
use crate::net::types::{ApiError, UserProfile};
use crate::store::{PersistedSnapshot, SessionStore};
use crate::validate::{
    ValidationErrors, validate_login, validate_password_update, validate_profile_update, validate_signup,
};

// =============================================================================
// SESSION
// =============================================================================

/// Where the session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unauthenticated,
    /// A credential round trip (login/signup/boot confirmation) is in
    /// flight.
    Authenticating,
    Authenticated,
    /// An update to an already-authenticated session is in flight.
    Refreshing,
}

/// In-memory record of who is using the app right now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub status: SessionStatus,
}

impl Session {
    /// The empty, unauthenticated session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None, token: None, status: SessionStatus::Unauthenticated }
    }

    /// Whether authorization-gated actions may run. Checks the token,
    /// not the user: a cached profile without a token is display-only.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::signed_out()
    }
}

/// Why a requested transition did not produce a new session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Form input failed local validation; nothing was sent or stored.
    #[error("invalid form input")]
    Validation(ValidationErrors),
    /// The operation needs a bearer token and the session has none.
    #[error("no session token; sign in first")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What a committed transition does to the persisted snapshot.
pub(super) enum SnapshotWrite {
    Save(PersistedSnapshot),
    Clear,
    Keep,
}

// =============================================================================
// SESSION HANDLE
// =============================================================================

/// Owner of the session: broadcaster, transition serializer, and the
/// only writer of the persisted snapshot.
pub struct SessionHandle {
    pub(super) api: Arc<dyn IdentityApi>,
    pub(super) store: Arc<dyn SessionStore>,
    tx: watch::Sender<Session>,
    /// Serializes user-initiated transitions in arrival order.
    transition: Mutex<()>,
    next_seq: AtomicU64,
    /// Highest committed sequence number; lower-numbered writes are
    /// discarded.
    gate: std::sync::Mutex<u64>,
    pub(super) reconciled: OnceCell<()>,
}

impl SessionHandle {
    #[must_use]
    pub fn new(api: Arc<dyn IdentityApi>, store: Arc<dyn SessionStore>) -> Self {
        let (tx, _rx) = watch::channel(Session::signed_out());
        Self {
            api,
            store,
            tx,
            transition: Mutex::new(()),
            next_seq: AtomicU64::new(0),
            gate: std::sync::Mutex::new(0),
            reconciled: OnceCell::new(),
        }
    }

    /// The latest published session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// A receiver that observes every published session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    // -------------------------------------------------------------------------
    // Sequence gate
    // -------------------------------------------------------------------------

    pub(super) fn begin(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Publish an in-progress or restored session unless a newer
    /// transition has already committed.
    pub(super) fn publish_if_fresh(&self, seq: u64, session: Session) -> bool {
        let last = self.gate.lock().expect("session gate poisoned");
        if seq < *last {
            tracing::debug!(seq, last = *last, "discarding stale session publish");
            return false;
        }
        self.tx.send_replace(session);
        true
    }

    /// Complete a transition: write the snapshot and publish the new
    /// session atomically, unless a newer transition already committed.
    pub(super) fn commit(&self, seq: u64, session: Session, write: SnapshotWrite) -> bool {
        let mut last = self.gate.lock().expect("session gate poisoned");
        if seq < *last {
            tracing::debug!(seq, last = *last, "discarding stale session commit");
            return false;
        }
        *last = seq;
        match write {
            SnapshotWrite::Save(snapshot) => snapshot.save(self.store.as_ref()),
            SnapshotWrite::Clear => PersistedSnapshot::clear(self.store.as_ref()),
            SnapshotWrite::Keep => {}
        }
        self.tx.send_replace(session);
        true
    }

    fn commit_authenticated(&self, seq: u64, token: String, user: UserProfile) -> Session {
        let session = Session {
            user: Some(user.clone()),
            token: Some(token.clone()),
            status: SessionStatus::Authenticated,
        };
        let snapshot = PersistedSnapshot { token: Some(token), user: Some(user) };
        self.commit(seq, session, SnapshotWrite::Save(snapshot));
        self.current()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] before any network call, or the
    /// API failure; on failure the prior session is restored untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return Err(SessionError::Validation(errors));
        }

        let _guard = self.transition.lock().await;
        let seq = self.begin();
        let prior = self.current();
        self.publish_if_fresh(seq, Session { status: SessionStatus::Authenticating, ..prior.clone() });

        match self.api.login(email, password).await {
            Ok(auth) => {
                tracing::debug!(user = %auth.user.id, "login succeeded");
                Ok(self.commit_authenticated(seq, auth.token, auth.user))
            }
            Err(e) => {
                self.publish_if_fresh(seq, prior);
                Err(e.into())
            }
        }
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionHandle::login`].
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Session, SessionError> {
        let errors = validate_signup(name, email, password, password_confirm);
        if !errors.is_empty() {
            return Err(SessionError::Validation(errors));
        }

        let _guard = self.transition.lock().await;
        let seq = self.begin();
        let prior = self.current();
        self.publish_if_fresh(seq, Session { status: SessionStatus::Authenticating, ..prior.clone() });

        match self.api.signup(name, email, password, password_confirm).await {
            Ok(auth) => {
                tracing::debug!(user = %auth.user.id, "signup succeeded");
                Ok(self.commit_authenticated(seq, auth.token, auth.user))
            }
            Err(e) => {
                self.publish_if_fresh(seq, prior);
                Err(e.into())
            }
        }
    }

    /// Clear the session locally. Always succeeds: the snapshot is
    /// removed and the empty session published regardless of network
    /// reachability; the server is notified in the background.
    pub async fn logout(&self) -> Session {
        let _guard = self.transition.lock().await;
        let seq = self.begin();
        let token = self.current().token;
        self.commit(seq, Session::signed_out(), SnapshotWrite::Clear);
        tracing::debug!("session cleared");

        if let Some(token) = token {
            let api = Arc::clone(&self.api);
            tokio::spawn(async move {
                api.notify_logout(&token).await;
            });
        }
        self.current()
    }

    /// Change the signed-in user's name and email.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`], [`SessionError::NotAuthenticated`]
    /// when no token is held, or the API failure (prior session
    /// restored).
    pub async fn update_profile(&self, name: &str, email: &str) -> Result<Session, SessionError> {
        let errors = validate_profile_update(name, email);
        if !errors.is_empty() {
            return Err(SessionError::Validation(errors));
        }

        let _guard = self.transition.lock().await;
        let prior = self.current();
        let Some(token) = prior.token.clone() else {
            return Err(SessionError::NotAuthenticated);
        };
        let seq = self.begin();
        self.publish_if_fresh(seq, Session { status: SessionStatus::Refreshing, ..prior.clone() });

        match self.api.update_profile(&token, name, email).await {
            Ok(user) => {
                tracing::debug!(user = %user.id, "profile updated");
                Ok(self.commit_authenticated(seq, token, user))
            }
            Err(e) => {
                self.publish_if_fresh(seq, prior);
                Err(e.into())
            }
        }
    }

    /// Change the signed-in user's password. The server may rotate the
    /// bearer token; when it does, the new token replaces the stored
    /// one.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionHandle::update_profile`].
    pub async fn update_password(
        &self,
        password_current: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Session, SessionError> {
        let errors = validate_password_update(password_current, password, password_confirm);
        if !errors.is_empty() {
            return Err(SessionError::Validation(errors));
        }

        let _guard = self.transition.lock().await;
        let prior = self.current();
        let Some(token) = prior.token.clone() else {
            return Err(SessionError::NotAuthenticated);
        };
        let seq = self.begin();
        self.publish_if_fresh(seq, Session { status: SessionStatus::Refreshing, ..prior.clone() });

        match self
            .api
            .update_password(&token, password_current, password, password_confirm)
            .await
        {
            Ok(refresh) => {
                let token = refresh.token.unwrap_or(token);
                tracing::debug!(user = %refresh.user.id, "password updated");
                Ok(self.commit_authenticated(seq, token, refresh.user))
            }
            Err(e) => {
                self.publish_if_fresh(seq, prior);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
