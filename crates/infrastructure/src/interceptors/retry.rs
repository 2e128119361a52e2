//! Retry of transient transport failures.

use std::time::Duration;

use async_trait::async_trait;
use rocket_application::{Interceptor, Next, RequestContext, TransportError};
use rocket_domain::{GraphQLResponse, OperationKind};

/// Re-runs the rest of the chain when a query fails transiently.
///
/// Mutations are never re-issued. The wait before attempt `n` is
/// `delay * n`.
#[derive(Debug, Clone, Copy)]
pub struct RetryInterceptor {
    max_retries: u32,
    delay: Duration,
}

impl RetryInterceptor {
    /// Name reported by [`Interceptor::name`].
    pub const NAME: &'static str = "retry";

    /// Creates a retry step allowing `max_retries` extra attempts.
    #[must_use]
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

#[async_trait]
impl Interceptor for RetryInterceptor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn intercept(
        &self,
        request: RequestContext,
        next: Next<'_>,
    ) -> Result<GraphQLResponse, TransportError> {
        if self.max_retries == 0 || request.operation().kind == OperationKind::Mutation {
            return next.proceed(request).await;
        }

        let mut attempt = 0;
        loop {
            match next.proceed(request.clone()).await {
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        request_id = %request.id(),
                        operation = request.operation().name,
                        attempt,
                        %error,
                        "retrying request"
                    );
                    tokio::time::sleep(self.delay * attempt).await;
                }
                outcome => return outcome,
            }
        }
    }
}
