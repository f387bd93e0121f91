//! Durable session storage.
//!
//! DESIGN
//! ======
//! The store is a dumb synchronous byte-string map keyed by `"token"`
//! and `"user"` — the reload-surviving analogue of browser local
//! storage. No validation happens at this layer; [`PersistedSnapshot`]
//! is the typed view on top of it and is the only reader/writer the
//! session code uses. Corrupt values degrade to "absent", never to a
//! crash.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::net::types::UserProfile;

/// Store key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Store key holding the serialized user snapshot.
pub const USER_KEY: &str = "user";

/// Key-scoped, synchronous, string-valued persistent store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store for tests and sessions that should not survive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("store lock poisoned").remove(key);
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Directory-backed store: one file per key.
///
/// Write and remove failures are logged and swallowed — losing a cached
/// session is recoverable (the user logs in again), crashing the app is
/// not.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create the backing directory if needed and open the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.path_for(key), value) {
            tracing::warn!(key, error = %e, "session store write failed");
        }
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(key, error = %e, "session store remove failed"),
        }
    }
}

// =============================================================================
// PERSISTED SNAPSHOT
// =============================================================================

/// The typed `{token, user}` pair persisted across reloads.
///
/// A token without a user cannot occur in a valid session, so such a
/// snapshot is treated as wholly absent on load. A user without a token
/// is legal but display-only: it must never authorize anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedSnapshot {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl PersistedSnapshot {
    /// Read both keys from the store. Corrupt or non-JSON user data is
    /// discarded as if absent.
    pub fn load(store: &dyn SessionStore) -> Self {
        let token = store.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = store.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| tracing::warn!(error = %e, "discarding corrupt user snapshot"))
                .ok()
        });

        if token.is_some() && user.is_none() {
            return Self::default();
        }
        Self { token, user }
    }

    /// Write both keys. `None` fields clear their key so the store never
    /// holds leftovers from an earlier session.
    pub fn save(&self, store: &dyn SessionStore) {
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token),
            None => store.remove(TOKEN_KEY),
        }
        match &self.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(json) => store.set(USER_KEY, &json),
                Err(e) => tracing::warn!(error = %e, "user snapshot serialization failed"),
            },
            None => store.remove(USER_KEY),
        }
    }

    /// Remove both keys.
    pub fn clear(store: &dyn SessionStore) {
        store.remove(TOKEN_KEY);
        store.remove(USER_KEY);
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
