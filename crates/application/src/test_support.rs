//! Test doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rocket_domain::GraphQLResponse;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::credentials::MemoryCredentialStore;
use crate::interceptor::{Interceptor, InterceptorChainFactory, RequestContext};
use crate::ports::{Transport, TransportError};
use crate::session::SessionClient;

type Reply = Result<GraphQLResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Transport answering from a queue of scripted replies and recording
/// every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<RequestContext>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_data(&self, data: Value) {
        self.push_response(GraphQLResponse::with_data(data));
    }

    pub fn push_response(&self, response: GraphQLResponse) {
        self.replies.lock().push_back(Scripted::Ready(Ok(response)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Scripted::Ready(Err(error)));
    }

    /// Queues a reply that is held back until the returned sender fires.
    pub fn push_deferred(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().push_back(Scripted::Deferred(rx));
        tx
    }

    pub fn sent(&self) -> Vec<RequestContext> {
        self.sent.lock().clone()
    }

    pub fn sent_names(&self) -> Vec<&'static str> {
        self.sent.lock().iter().map(|r| r.operation().name).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestContext) -> Result<GraphQLResponse, TransportError> {
        self.sent.lock().push(request.clone());
        let next = self.replies.lock().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Other("reply dropped".to_string()))),
            None => Err(TransportError::Other("no scripted reply".to_string())),
        }
    }
}

/// Session client over `transport` with the token injector and no base chain.
pub fn client_with(transport: &Arc<ScriptedTransport>) -> SessionClient {
    client_with_store(transport, Arc::new(MemoryCredentialStore::new()))
}

pub fn client_with_store(
    transport: &Arc<ScriptedTransport>,
    store: Arc<MemoryCredentialStore>,
) -> SessionClient {
    let base: Vec<Arc<dyn Interceptor>> = Vec::new();
    let transport: Arc<dyn Transport> = Arc::clone(transport) as Arc<dyn Transport>;
    SessionClient::new(
        transport,
        Arc::new(InterceptorChainFactory::new(store, Arc::new(base))),
    )
}

/// Receives the next message, failing the test after one second.
#[allow(clippy::expect_used)]
pub async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for completion")
        .expect("channel closed")
}
