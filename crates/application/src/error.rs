//! Application error types

use rocket_domain::DomainError;
use thiserror::Error;

use crate::booking::{BookingError, BookingFailure};
use crate::login::LoginFailure;
use crate::pager::PagerError;
use crate::ports::{CredentialError, TransportError};

/// Any error the session layer can report, for callers that funnel
/// failures into a single display path.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Input failed domain validation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A request failed at the transport level.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Credentials could not be stored.
    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),

    /// A page of launches could not be loaded.
    #[error(transparent)]
    Pager(#[from] PagerError),

    /// A booking change failed.
    #[error(transparent)]
    Booking(#[from] BookingFailure),

    /// A booking change could not be attempted.
    #[error(transparent)]
    BookingRejected(#[from] BookingError),

    /// Login failed.
    #[error(transparent)]
    Login(#[from] LoginFailure),

    /// A request ended without delivering its completion.
    #[error("request was cancelled before completing")]
    Cancelled,

    /// Data could not be loaded; carries the reasons for display.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The server has no record of the requested entity.
    #[error("{0} not found")]
    NotFound(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
