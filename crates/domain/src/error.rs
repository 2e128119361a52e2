//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating client input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No email address was entered.
    #[error("Please enter an email address.")]
    EmptyEmail,

    /// The email address is malformed.
    #[error("Please enter a valid email.")]
    InvalidEmail(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
