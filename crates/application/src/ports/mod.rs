//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session layer and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer (or by test doubles).

mod cancellation;
mod credential_store;
mod transport;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use credential_store::{CredentialError, CredentialStore};
pub use transport::{Transport, TransportError};
