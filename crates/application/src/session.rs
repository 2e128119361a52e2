//! Session client: the single owned entry point to the GraphQL transport.

use std::sync::Arc;

use rocket_domain::{
    CachePolicy, GraphQLResponse, GraphQLResult, Mutation, Operation, Query, RequestId,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::interceptor::{InterceptorProvider, Next, RequestContext};
use crate::ports::{CancellationToken, Transport, TransportError};

/// Outcome delivered to a completion callback.
///
/// `Ok` carries data and/or GraphQL errors; `Err` is a total transport
/// failure with no data.
pub type Completion<D> = Result<GraphQLResult<D>, TransportError>;

/// Cancellable reference to an in-flight request.
///
/// Dropping a handle does not cancel the request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: RequestId,
    token: CancellationToken,
}

impl RequestHandle {
    /// Id of the request this handle controls.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Cancels the request. Its completion callback will not run unless
    /// it has already started.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl PartialEq for RequestHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequestHandle {}

/// Issues queries and mutations through the interceptor chain.
///
/// Requests run on the tokio runtime; each completion callback is invoked
/// at most once, and never after the handle was cancelled. Completions of
/// different requests are not ordered relative to each other.
///
/// # Example
///
/// ```ignore
/// let client = SessionClient::new(transport, Arc::new(factory));
/// let handle = client.fetch(&LaunchListQuery::default(), CachePolicy::default(), |result| {
///     // runs once, on a runtime worker
/// });
/// ```
pub struct SessionClient {
    transport: Arc<dyn Transport>,
    chain: Arc<dyn InterceptorProvider>,
}

impl SessionClient {
    /// Creates a client sending through `transport` with the chain from `chain`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, chain: Arc<dyn InterceptorProvider>) -> Self {
        Self { transport, chain }
    }

    /// Starts a read. Returns immediately; `completion` runs when it finishes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch<Q, F>(&self, query: &Q, cache_policy: CachePolicy, completion: F) -> RequestHandle
    where
        Q: Query,
        F: FnOnce(Completion<Q::Data>) + Send + 'static,
    {
        self.dispatch(query, cache_policy, move |_, result| completion(result))
    }

    /// Like [`fetch`](Self::fetch), but the callback also receives the
    /// request id, so owners can match a completion to the handle they hold.
    pub fn fetch_tagged<Q, F>(&self, query: &Q, cache_policy: CachePolicy, completion: F) -> RequestHandle
    where
        Q: Query,
        F: FnOnce(RequestId, Completion<Q::Data>) + Send + 'static,
    {
        self.dispatch(query, cache_policy, completion)
    }

    /// Starts a write. Mutations always bypass the cache.
    ///
    /// Must be called from within a tokio runtime.
    pub fn perform<M, F>(&self, mutation: &M, completion: F) -> RequestHandle
    where
        M: Mutation,
        F: FnOnce(Completion<M::Data>) + Send + 'static,
    {
        self.dispatch(
            mutation,
            CachePolicy::FetchIgnoringCacheCompletely,
            move |_, result| completion(result),
        )
    }

    fn dispatch<O, F>(&self, operation: &O, cache_policy: CachePolicy, completion: F) -> RequestHandle
    where
        O: Operation,
        F: FnOnce(RequestId, Completion<O::Data>) + Send + 'static,
    {
        let request = RequestContext::for_operation(operation, cache_policy);
        let id = request.id();
        let interceptors = self.chain.interceptors(&request.operation());
        let transport = Arc::clone(&self.transport);
        let (token, mut cancelled) = CancellationToken::new();

        tracing::debug!(
            request_id = %id,
            operation = O::NAME,
            cache_policy = ?request.cache_policy(),
            "dispatching operation"
        );

        tokio::spawn(async move {
            let chain = Next::new(&interceptors, transport.as_ref());
            tokio::select! {
                biased;
                () = cancelled.cancelled() => {
                    tracing::debug!(request_id = %id, operation = O::NAME, "request cancelled");
                }
                result = chain.proceed(request) => {
                    completion(id, result.and_then(decode::<O::Data>));
                }
            }
        });

        RequestHandle { id, token }
    }
}

/// Decodes the `data` member.
///
/// Data that does not decode is only a failure when the server reported
/// nothing else: alongside GraphQL errors it is treated as absent, so the
/// errors reach the caller unchanged.
fn decode<D: DeserializeOwned>(response: GraphQLResponse) -> Completion<D> {
    let data = match response.data {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(error) if response.errors.is_empty() => {
                return Err(TransportError::Serialization(error.to_string()));
            }
            Err(error) => {
                tracing::debug!(%error, "undecodable data delivered with errors");
                None
            }
        },
    };

    Ok(GraphQLResult {
        data,
        errors: response.errors,
    })
}
