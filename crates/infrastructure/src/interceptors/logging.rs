//! Per-request tracing.

use std::time::Instant;

use async_trait::async_trait;
use rocket_application::{Interceptor, Next, RequestContext, TransportError};
use rocket_domain::GraphQLResponse;
use tracing::Instrument;

/// Wraps the rest of the chain in a span and logs the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLoggingInterceptor;

impl RequestLoggingInterceptor {
    /// Name reported by [`Interceptor::name`].
    pub const NAME: &'static str = "request_logging";

    /// Creates the logging step.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interceptor for RequestLoggingInterceptor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn intercept(
        &self,
        request: RequestContext,
        next: Next<'_>,
    ) -> Result<GraphQLResponse, TransportError> {
        let span = tracing::info_span!(
            "graphql",
            request_id = %request.id(),
            operation = request.operation().name,
        );
        let start = Instant::now();

        let outcome = next.proceed(request).instrument(span.clone()).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        span.in_scope(|| match &outcome {
            Ok(response) if response.errors.is_empty() => {
                tracing::debug!(elapsed_ms, "request completed");
            }
            Ok(response) => {
                tracing::info!(
                    elapsed_ms,
                    errors = response.errors.len(),
                    "request completed with errors"
                );
            }
            Err(error) => {
                tracing::warn!(elapsed_ms, %error, "request failed");
            }
        });

        outcome
    }
}
