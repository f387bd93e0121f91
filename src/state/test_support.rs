//! Scripted identity API mock and fixtures for state tests.

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use crate::net::api::IdentityApi;
use crate::net::types::{ApiError, AuthSession, CredentialRefresh, UserProfile};
use crate::state::session::SessionHandle;
use crate::store::MemoryStore;

pub(crate) fn sample_user(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: id.to_owned(),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        photo: None,
        role: "user".to_owned(),
    }
}

// =============================================================================
// MockIdentityApi
// =============================================================================

/// Scripted [`IdentityApi`]: each method pops its next canned result.
/// An unscripted call panics, which doubles as a "no network call was
/// made" assertion. Optional semaphore gates let tests hold a call
/// in flight until they release a permit.
#[derive(Default)]
pub(crate) struct MockIdentityApi {
    pub login_results: Mutex<Vec<Result<AuthSession, ApiError>>>,
    pub signup_results: Mutex<Vec<Result<AuthSession, ApiError>>>,
    pub fetch_results: Mutex<Vec<Result<Option<UserProfile>, ApiError>>>,
    pub profile_results: Mutex<Vec<Result<UserProfile, ApiError>>>,
    pub password_results: Mutex<Vec<Result<CredentialRefresh, ApiError>>>,
    pub login_gate: Option<Arc<Semaphore>>,
    pub fetch_gate: Option<Arc<Semaphore>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub logout_notices: Mutex<Vec<String>>,
}

impl MockIdentityApi {
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn pop<T>(queue: &Mutex<Vec<Result<T, ApiError>>>, what: &str) -> Result<T, ApiError> {
    let mut queue = queue.lock().unwrap();
    assert!(!queue.is_empty(), "unscripted {what} call");
    queue.remove(0)
}

async fn wait(gate: Option<&Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.unwrap().forget();
    }
}

#[async_trait::async_trait]
impl IdentityApi for MockIdentityApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthSession, ApiError> {
        self.calls.lock().unwrap().push("login");
        wait(self.login_gate.as_ref()).await;
        pop(&self.login_results, "login")
    }

    async fn signup(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
        _password_confirm: &str,
    ) -> Result<AuthSession, ApiError> {
        self.calls.lock().unwrap().push("signup");
        pop(&self.signup_results, "signup")
    }

    async fn fetch_current_user(&self, _token: &str) -> Result<Option<UserProfile>, ApiError> {
        self.calls.lock().unwrap().push("fetch_current_user");
        wait(self.fetch_gate.as_ref()).await;
        pop(&self.fetch_results, "fetch_current_user")
    }

    async fn update_profile(&self, _token: &str, _name: &str, _email: &str) -> Result<UserProfile, ApiError> {
        self.calls.lock().unwrap().push("update_profile");
        pop(&self.profile_results, "update_profile")
    }

    async fn update_password(
        &self,
        _token: &str,
        _password_current: &str,
        _password: &str,
        _password_confirm: &str,
    ) -> Result<CredentialRefresh, ApiError> {
        self.calls.lock().unwrap().push("update_password");
        pop(&self.password_results, "update_password")
    }

    async fn notify_logout(&self, token: &str) {
        self.calls.lock().unwrap().push("notify_logout");
        self.logout_notices.lock().unwrap().push(token.to_owned());
    }
}

/// Build a handle over the given mock and a fresh in-memory store.
pub(crate) fn session_fixture(api: MockIdentityApi) -> (Arc<MockIdentityApi>, Arc<MemoryStore>, SessionHandle) {
    let api = Arc::new(api);
    let store = Arc::new(MemoryStore::new());
    let handle = SessionHandle::new(api.clone(), store.clone());
    (api, store, handle)
}
