//! In-memory credential storage.
//!
//! This module provides a thread-safe store for session tokens, used
//! when nothing needs to survive a restart and as the default in tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rocket_domain::Token;

use crate::ports::{CredentialError, CredentialStore};

/// Thread-safe in-memory token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get session status for display.
    #[must_use]
    pub fn status(&self, key: &str) -> SessionStatus {
        SessionStatus::of(self.get(key).as_ref())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<Token> {
        self.tokens.read().get(key).cloned()
    }

    fn set(&self, key: &str, token: Token) -> Result<(), CredentialError> {
        self.tokens.write().insert(key.to_string(), token);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Token>, CredentialError> {
        Ok(self.tokens.write().remove(key))
    }
}

/// Status of the session slot for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token exists for this key.
    NotAuthenticated,
    /// A token is stored.
    Authenticated {
        /// Redacted preview of the token.
        token_preview: String,
    },
}

impl SessionStatus {
    /// Derives the status from an optional token.
    #[must_use]
    pub fn of(token: Option<&Token>) -> Self {
        token.map_or(Self::NotAuthenticated, |token| Self::Authenticated {
            token_preview: token.preview(),
        })
    }

    /// Returns true if a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not logged in".to_string(),
            Self::Authenticated { token_preview } => format!("Logged in ({token_preview})"),
        }
    }
}
