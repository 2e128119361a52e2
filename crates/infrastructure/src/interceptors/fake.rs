//! Scripted transport for interceptor tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use rocket_application::{RequestContext, Transport, TransportError};
use rocket_domain::GraphQLResponse;

/// Replies with queued results and records what it was sent.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Result<GraphQLResponse, TransportError>>>,
    sent: Mutex<Vec<RequestContext>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<GraphQLResponse, TransportError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &RequestContext) -> Result<GraphQLResponse, TransportError> {
        self.sent.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_string())))
    }
}
