//! Transport port

use async_trait::async_trait;
use rocket_domain::GraphQLResponse;
use thiserror::Error;

use crate::interceptor::RequestContext;

/// Total failure of a request: no GraphQL data is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established or was dropped.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-success status and no GraphQL body.
    #[error("Server responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request or response payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if re-issuing the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed(_) => true,
            Self::Status { status } => *status >= 500,
            _ => false,
        }
    }
}

/// Port for sending a fully prepared request to the GraphQL server.
///
/// This is the terminal step of every interceptor chain. Implementations
/// must not alter the request; header policy belongs to interceptors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response envelope.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no GraphQL response could be obtained.
    async fn send(&self, request: &RequestContext) -> Result<GraphQLResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TransportError::Timeout { timeout_ms: 10 }.is_retryable());
        assert!(TransportError::ConnectionFailed("reset".to_string()).is_retryable());
        assert!(TransportError::Status { status: 503 }.is_retryable());
        assert!(!TransportError::Status { status: 400 }.is_retryable());
        assert!(!TransportError::Serialization("bad".to_string()).is_retryable());
    }
}
