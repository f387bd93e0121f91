//! Boot-time session reconciliation.
//!
//! ALGORITHM
//! =========
//! 1. Publish the persisted snapshot optimistically so the UI never
//!    flashes a logged-out state while the network round trip runs.
//! 2. If a token exists, confirm it with `/users/me`:
//!    - accepted: the server's profile wins over the cache;
//!    - explicitly rejected: the one path that logs a user out without
//!      user action — token and user are cleared everywhere;
//!    - unreachable: keep the optimistic session and the snapshot. A
//!      transient network failure must not evict a signed-in user.
//!
//! Reconciliation is single-flight per handle: concurrent callers await
//! the in-flight run instead of issuing a duplicate network call.

use crate::net::types::ApiError;
use crate::state::session::{Session, SessionHandle, SessionStatus, SnapshotWrite};
use crate::store::PersistedSnapshot;

impl SessionHandle {
    /// Run boot reconciliation (once) and return the resulting session.
    ///
    /// Safe to call from every mount point; all calls after the first
    /// observe the original run's outcome.
    pub async fn reconcile(&self) -> Session {
        self.reconciled.get_or_init(|| self.reconcile_once()).await;
        self.current()
    }

    async fn reconcile_once(&self) {
        // Sequence first, then read: a login that lands between the two
        // outranks this run and will discard its writes.
        let seq = self.begin();
        let snapshot = PersistedSnapshot::load(self.store.as_ref());

        let Some(token) = snapshot.token.clone() else {
            if let Some(user) = snapshot.user {
                // Cached profile without a token: shown immediately,
                // authorizes nothing.
                self.publish_if_fresh(
                    seq,
                    Session { user: Some(user), token: None, status: SessionStatus::Unauthenticated },
                );
            }
            return;
        };

        let optimistic = Session {
            user: snapshot.user.clone(),
            token: Some(token.clone()),
            status: SessionStatus::Authenticating,
        };
        self.publish_if_fresh(seq, optimistic.clone());

        match self.api.fetch_current_user(&token).await {
            Ok(Some(user)) => {
                tracing::debug!(user = %user.id, "session confirmed by server");
                let session = Session {
                    user: Some(user.clone()),
                    token: Some(token.clone()),
                    status: SessionStatus::Authenticated,
                };
                let snapshot = PersistedSnapshot { token: Some(token), user: Some(user) };
                self.commit(seq, session, SnapshotWrite::Save(snapshot));
            }
            Ok(None) => {
                // Token accepted but the payload carried no profile;
                // keep the cached one.
                self.commit(seq, Session { status: SessionStatus::Authenticated, ..optimistic }, SnapshotWrite::Keep);
            }
            Err(ApiError::Unauthorized(message)) => {
                tracing::warn!(%message, "stored token rejected; clearing session");
                self.commit(seq, Session::signed_out(), SnapshotWrite::Clear);
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed; keeping optimistic session");
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
