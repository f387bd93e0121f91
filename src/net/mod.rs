//! Remote identity service wiring.
//!
//! `types` holds the wire contract (user profile, response envelope,
//! error taxonomy); `api` holds the [`IdentityApi`](api::IdentityApi)
//! trait and its reqwest-backed implementation.

pub mod api;
pub mod types;
