//! Interceptor chain composition.

use std::sync::Arc;

use rocket_domain::OperationDescriptor;

use super::{Interceptor, InterceptorProvider, TokenInjectingInterceptor};
use crate::ports::CredentialStore;

/// Builds the chain for every operation: the token injector first,
/// followed by the base chain supplied by the transport collaborator.
///
/// This is the one place cross-cutting request policy is added; call
/// sites and the transport stay untouched.
pub struct InterceptorChainFactory {
    injector: Arc<dyn Interceptor>,
    base: Arc<dyn InterceptorProvider>,
}

impl InterceptorChainFactory {
    /// Creates a factory injecting tokens from `store` ahead of `base`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, base: Arc<dyn InterceptorProvider>) -> Self {
        Self {
            injector: Arc::new(TokenInjectingInterceptor::new(store)),
            base,
        }
    }
}

impl InterceptorProvider for InterceptorChainFactory {
    fn interceptors(&self, operation: &OperationDescriptor) -> Vec<Arc<dyn Interceptor>> {
        let base = self.base.interceptors(operation);
        let mut chain = Vec::with_capacity(base.len() + 1);
        chain.push(Arc::clone(&self.injector));
        chain.extend(base);
        chain
    }
}
