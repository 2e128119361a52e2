//! Interceptor chain mechanics.

use std::sync::Arc;

use async_trait::async_trait;
use rocket_domain::{GraphQLResponse, OperationDescriptor};

use super::RequestContext;
use crate::ports::{Transport, TransportError};

/// A unit in the request chain.
///
/// An interceptor may inspect or mutate the request, then hand it to
/// `next`. It may also answer without calling `next` (a cache hit) or
/// call it more than once (a retry).
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Short stable name, used in logs and tests.
    fn name(&self) -> &'static str;

    /// Processes `request` and produces the response for the caller.
    ///
    /// # Errors
    ///
    /// Returns the `TransportError` produced downstream, or one of its own.
    async fn intercept(
        &self,
        request: RequestContext,
        next: Next<'_>,
    ) -> Result<GraphQLResponse, TransportError>;
}

/// Continuation into the remainder of the chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    /// Creates the continuation for a whole chain ending in `transport`.
    #[must_use]
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>], transport: &'a dyn Transport) -> Self {
        Self {
            interceptors,
            transport,
        }
    }

    /// Runs the rest of the chain with `request`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the remaining interceptors or the transport produce.
    pub async fn proceed(self, request: RequestContext) -> Result<GraphQLResponse, TransportError> {
        match self.interceptors.split_first() {
            Some((head, rest)) => {
                head.intercept(
                    request,
                    Next {
                        interceptors: rest,
                        transport: self.transport,
                    },
                )
                .await
            }
            None => self.transport.send(&request).await,
        }
    }
}

/// Supplies the ordered interceptor list for an operation.
pub trait InterceptorProvider: Send + Sync {
    /// Returns the interceptors to run, in order, for `operation`.
    fn interceptors(&self, operation: &OperationDescriptor) -> Vec<Arc<dyn Interceptor>>;
}

/// A fixed list is a provider that returns the same chain for every operation.
impl InterceptorProvider for Vec<Arc<dyn Interceptor>> {
    fn interceptors(&self, _operation: &OperationDescriptor) -> Vec<Arc<dyn Interceptor>> {
        self.clone()
    }
}
