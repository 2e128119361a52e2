//! Credential store port
//!
//! Defines the interface for persisting the session token.

use rocket_domain::Token;

/// Errors that can occur while writing credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key/value store for opaque session tokens.
///
/// Lookups are synchronous: they happen on the request path, once per
/// outgoing operation.
pub trait CredentialStore: Send + Sync {
    /// Returns the token stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Token>;

    /// Stores `token` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted.
    fn set(&self, key: &str, token: Token) -> Result<(), CredentialError>;

    /// Removes the token stored under `key`, returning it.
    ///
    /// # Errors
    /// Returns an error if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<Option<Token>, CredentialError>;

    /// Returns true if a token is stored under `key`.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
