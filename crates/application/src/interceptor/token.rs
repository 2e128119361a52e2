//! Session token injection.

use std::sync::Arc;

use async_trait::async_trait;
use rocket_domain::{GraphQLResponse, SESSION_KEY};

use super::{Interceptor, Next, RequestContext};
use crate::ports::{CredentialStore, TransportError};

/// Header carrying the session token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Attaches the stored session token to every outgoing request.
///
/// The token is sent verbatim, without a scheme prefix. A missing token
/// is a valid unauthenticated state: the request proceeds unchanged.
pub struct TokenInjectingInterceptor {
    store: Arc<dyn CredentialStore>,
    key: String,
}

impl TokenInjectingInterceptor {
    /// Stable name of this interceptor.
    pub const NAME: &'static str = "token_injector";

    /// Creates an injector reading the well-known session slot.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_key(store, SESSION_KEY)
    }

    /// Creates an injector reading a custom slot.
    #[must_use]
    pub fn with_key(store: Arc<dyn CredentialStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl Interceptor for TokenInjectingInterceptor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn intercept(
        &self,
        mut request: RequestContext,
        next: Next<'_>,
    ) -> Result<GraphQLResponse, TransportError> {
        if let Some(token) = self.store.get(&self.key) {
            tracing::trace!(
                request_id = %request.id(),
                operation = request.operation().name,
                token = %token.preview(),
                "attaching session token"
            );
            request.add_header(AUTHORIZATION_HEADER, token.expose());
        }

        next.proceed(request).await
    }
}
