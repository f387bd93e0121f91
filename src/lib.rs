//! # tourbook-client
//!
//! Client-side authentication and session management for the Tourbook
//! booking site. The UI layers (tour listings, detail pages, forms) sit
//! on top of this crate; everything here is about establishing,
//! persisting, and invalidating the current user's identity.
//!
//! ARCHITECTURE
//! ============
//! Two independently-fallible sources of truth are reconciled into one
//! in-memory [`Session`]: a durable store surviving reloads (bearer
//! token + cached user snapshot) and the remote identity service. On
//! boot the cached snapshot is published optimistically so the UI never
//! flashes a logged-out state, then a `/users/me` round trip confirms
//! or evicts it. All mutations funnel through [`SessionHandle`], which
//! serializes transitions and broadcasts every published session to
//! subscribers.

pub mod config;
pub mod net;
pub mod state;
pub mod store;
pub mod validate;

pub use config::ClientConfig;
pub use net::api::{HttpIdentityClient, IdentityApi};
pub use net::types::{ApiError, AuthSession, CredentialRefresh, UserProfile};
pub use state::session::{Session, SessionError, SessionHandle, SessionStatus};
pub use store::{FileStore, MemoryStore, PersistedSnapshot, SessionStore};
pub use validate::ValidationErrors;
