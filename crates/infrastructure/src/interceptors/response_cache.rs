//! In-memory normalized-by-operation response cache.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rocket_application::{Interceptor, Next, RequestContext, TransportError};
use rocket_domain::{GraphQLResponse, OperationKind};

/// Answers cache-first queries from memory and remembers complete responses.
///
/// Entries are keyed by operation name and variables. Only queries issued
/// with `ReturnCacheDataElseFetch` read or write the cache.
#[derive(Debug, Clone, Default)]
pub struct ResponseCacheInterceptor {
    entries: Arc<RwLock<HashMap<String, GraphQLResponse>>>,
}

impl ResponseCacheInterceptor {
    /// Name reported by [`Interceptor::name`].
    pub const NAME: &'static str = "response_cache";

    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl Interceptor for ResponseCacheInterceptor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn intercept(
        &self,
        request: RequestContext,
        next: Next<'_>,
    ) -> Result<GraphQLResponse, TransportError> {
        let cacheable = request.operation().kind == OperationKind::Query
            && request.cache_policy().reads_cache();
        if !cacheable {
            return next.proceed(request).await;
        }

        let key = request.cache_key();
        let cached = self.entries.read().get(&key).cloned();
        if let Some(hit) = cached {
            tracing::debug!(request_id = %request.id(), %key, "cache hit");
            return Ok(hit);
        }

        let response = next.proceed(request).await?;
        if response.is_complete() {
            self.entries.write().insert(key, response.clone());
            tracing::trace!(entries = self.len(), "response cached");
        }
        Ok(response)
    }
}
