//! Default interceptors placed after the token injector.

mod logging;
mod response_cache;
mod retry;

#[cfg(test)]
mod fake;

use std::sync::Arc;
use std::time::Duration;

use rocket_application::{Interceptor, InterceptorProvider};
use rocket_domain::OperationDescriptor;

pub use logging::RequestLoggingInterceptor;
pub use response_cache::ResponseCacheInterceptor;
pub use retry::RetryInterceptor;

/// The standard chain: response cache, retry, request logging.
///
/// The same instances serve every operation, so the cache is shared by
/// all requests of a client.
pub struct DefaultInterceptors {
    chain: Vec<Arc<dyn Interceptor>>,
}

impl DefaultInterceptors {
    /// Builds the chain with the given retry settings.
    #[must_use]
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        let chain: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(ResponseCacheInterceptor::new()),
            Arc::new(RetryInterceptor::new(max_retries, retry_delay)),
            Arc::new(RequestLoggingInterceptor::new()),
        ];
        Self { chain }
    }
}

impl InterceptorProvider for DefaultInterceptors {
    fn interceptors(&self, _operation: &OperationDescriptor) -> Vec<Arc<dyn Interceptor>> {
        self.chain.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rocket_domain::OperationKind;

    #[test]
    fn test_default_order() {
        let defaults = DefaultInterceptors::new(0, Duration::ZERO);
        for kind in [OperationKind::Query, OperationKind::Mutation] {
            let descriptor = OperationDescriptor { name: "Any", kind };
            let names: Vec<_> = defaults
                .interceptors(&descriptor)
                .iter()
                .map(|i| i.name())
                .collect();
            assert_eq!(names, vec!["response_cache", "retry", "request_logging"]);
        }
    }
}
