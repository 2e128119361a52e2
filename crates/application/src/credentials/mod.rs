//! Credential storage for the session token.
//!
//! This module provides:
//! - An in-memory `CredentialStore` implementation
//! - Session status snapshots for display

mod memory_store;

pub use memory_store::{MemoryCredentialStore, SessionStatus};
