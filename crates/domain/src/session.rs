//! Session credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Well-known credential slot holding the session token.
pub const SESSION_KEY: &str = "login";

/// Opaque session token issued at login.
///
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wraps a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token, exactly as issued.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Get a preview of the token (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.chars().count() > 12 {
            let head: String = self.0.chars().take(8).collect();
            format!("{head}...")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.preview()).finish()
    }
}

/// A syntactically plausible email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and wraps an email address.
    ///
    /// Surrounding whitespace is trimmed; the address must then be
    /// non-empty and contain an `@`.
    ///
    /// # Errors
    /// Returns `DomainError::EmptyEmail` or `DomainError::InvalidEmail`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyEmail);
        }
        if !trimmed.contains('@') {
            return Err(DomainError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
