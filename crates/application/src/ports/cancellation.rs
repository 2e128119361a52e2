//! Cancellation signalling for in-flight requests.

use std::sync::Arc;

use tokio::sync::watch;

/// Sending half of a cancellation signal.
///
/// Cloning shares the same signal. Dropping every token does not cancel.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

/// Receiving half of a cancellation signal.
#[derive(Debug)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a linked token/receiver pair.
    #[must_use]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            CancellationReceiver { receiver },
        )
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl CancellationReceiver {
    /// Resolves once the linked token is cancelled.
    ///
    /// Never resolves if every token is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
