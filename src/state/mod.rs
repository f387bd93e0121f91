//! Shared session state.
//!
//! DESIGN
//! ======
//! One [`SessionHandle`](session::SessionHandle) per running client
//! owns the authoritative [`Session`](session::Session) and broadcasts
//! every published value to subscribers. Views read and subscribe; only
//! the handle writes. `reconcile` holds the boot-time merge of the
//! persisted snapshot with a fresh server round trip.

pub mod reconcile;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
