//! GraphQL transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port: it posts the request body
//! as JSON to the configured endpoint and decodes the response envelope.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use rocket_application::{RequestContext, Transport, TransportError};
use rocket_domain::GraphQLResponse;
use serde_json::Value;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Transport posting GraphQL requests over HTTP.
///
/// The transport sends exactly the headers found on the request; it adds
/// none of its own beyond `Content-Type` and the client's user agent.
pub struct ReqwestTransport {
    client: Client,
    endpoint: Url,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the client
    /// cannot be created.
    pub fn new(endpoint: &str, timeout_ms: u64, user_agent: &str) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {endpoint}")))?;
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self::with_client(client, endpoint, timeout_ms))
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, endpoint: Url, timeout_ms: u64) -> Self {
        Self {
            client,
            endpoint,
            timeout_ms,
        }
    }

    /// The GraphQL endpoint requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }
        // Raised before anything is sent, e.g. for a header value with control characters.
        if error.is_builder() {
            return TransportError::Other(format!("invalid request: {error}"));
        }
        if error.is_connect() || error.is_request() {
            return TransportError::ConnectionFailed(error.to_string());
        }

        TransportError::Other(error.to_string())
    }

    /// Decodes a response body.
    ///
    /// A body carrying a GraphQL envelope is returned whatever the status,
    /// so servers that report errors with 4xx codes still surface them.
    fn parse_envelope(status: u16, body: &[u8]) -> Result<GraphQLResponse, TransportError> {
        let envelope = serde_json::from_slice::<Value>(body)
            .ok()
            .filter(|value| {
                value
                    .as_object()
                    .is_some_and(|o| o.contains_key("data") || o.contains_key("errors"))
            });

        match envelope {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| TransportError::Serialization(e.to_string())),
            None if !(200..300).contains(&status) => Err(TransportError::Status { status }),
            None => Err(TransportError::Serialization(
                "response is not a GraphQL envelope".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestContext) -> Result<GraphQLResponse, TransportError> {
        let start = Instant::now();
        let timeout_ms = self.timeout_ms;

        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .timeout(Duration::from_millis(timeout_ms))
            .json(&request.body());

        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        tracing::trace!(
            request_id = %request.id(),
            status,
            bytes = body.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        Self::parse_envelope(status, &body)
    }
}
