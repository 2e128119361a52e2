//! Per-request context threaded through the interceptor chain.

use std::collections::BTreeMap;

use rocket_domain::{
    CachePolicy, GraphQLRequestBody, Operation, OperationDescriptor, OperationKind, RequestId,
};
use serde_json::Value;

/// Mutable request state owned by the chain for one in-flight operation.
///
/// Header names are matched case-insensitively; the casing of the most
/// recent `add_header` call wins.
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: RequestId,
    operation: OperationDescriptor,
    document: &'static str,
    variables: Value,
    cache_policy: CachePolicy,
    headers: BTreeMap<String, (String, String)>,
}

impl RequestContext {
    /// Builds the context for `operation`.
    ///
    /// Mutations always bypass the cache whatever `cache_policy` says.
    #[must_use]
    pub fn for_operation<O: Operation>(operation: &O, cache_policy: CachePolicy) -> Self {
        let cache_policy = match O::KIND {
            OperationKind::Query => cache_policy,
            OperationKind::Mutation => CachePolicy::FetchIgnoringCacheCompletely,
        };
        Self {
            id: RequestId::new(),
            operation: operation.descriptor(),
            document: O::DOCUMENT,
            variables: operation.variables(),
            cache_policy,
            headers: BTreeMap::new(),
        }
    }

    /// Unique id of this request.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Name and kind of the operation.
    #[must_use]
    pub const fn operation(&self) -> OperationDescriptor {
        self.operation
    }

    /// The operation's variables.
    #[must_use]
    pub const fn variables(&self) -> &Value {
        &self.variables
    }

    /// Cache policy in effect for this request.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .insert(name.to_ascii_lowercase(), (name, value.into()));
    }

    /// Looks up a header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over headers as `(name, value)` pairs.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Renders the GraphQL POST body.
    #[must_use]
    pub fn body(&self) -> GraphQLRequestBody<'_> {
        GraphQLRequestBody {
            query: self.document,
            operation_name: self.operation.name,
            variables: &self.variables,
        }
    }

    /// Key identifying the response in a cache: operation name plus variables.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.operation.name, self.variables)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rocket_domain::{BookTripsMutation, LaunchId, LaunchListQuery, PageCursor};

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut context =
            RequestContext::for_operation(&LaunchListQuery::default(), CachePolicy::default());
        context.add_header("authorization", "old");
        context.add_header("Authorization", "new");

        assert_eq!(context.header("AUTHORIZATION"), Some("new"));
        assert_eq!(
            context.headers().collect::<Vec<_>>(),
            vec![("Authorization", "new")]
        );
        assert_eq!(context.header("Content-Type"), None);
    }

    #[test]
    fn test_mutations_bypass_cache() {
        let mutation = BookTripsMutation::single(LaunchId::parse("1").unwrap());
        let context =
            RequestContext::for_operation(&mutation, CachePolicy::ReturnCacheDataElseFetch);
        assert_eq!(
            context.cache_policy(),
            CachePolicy::FetchIgnoringCacheCompletely
        );
    }

    #[test]
    fn test_cache_key_includes_variables() {
        let first = RequestContext::for_operation(&LaunchListQuery::default(), CachePolicy::default());
        let second = RequestContext::for_operation(
            &LaunchListQuery {
                cursor: Some(PageCursor::new("c1")),
            },
            CachePolicy::default(),
        );
        assert_ne!(first.cache_key(), second.cache_key());
        assert_ne!(first.id(), second.id());
        assert_eq!(first.body().operation_name, "LaunchList");
    }
}
