//! Event broker - per-topic at-least-once transport
//!
//! One bounded channel per product topic. Publishing awaits channel capacity:
//! the write-path caller blocks until the message is accepted, publish is not
//! fire-and-forget. There is no backpressure beyond the channel bound and no
//! cross-topic ordering guarantee; in-topic ordering is best-effort.
//!
//! `new()` returns the broker handle together with the receiver set, the
//! worker side of the five topics (same shape as a router handing out its
//! channels).

use shared::ProductTopic;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::utils::{RepoError, RepoResult};

/// Receiver side of the five topic channels, consumed by the dispatcher
pub struct TopicReceivers {
    pub created: mpsc::Receiver<Vec<u8>>,
    pub updated: mpsc::Receiver<Vec<u8>>,
    pub deleted: mpsc::Receiver<Vec<u8>>,
    pub views_incremented: mpsc::Receiver<Vec<u8>>,
    pub buys_incremented: mpsc::Receiver<Vec<u8>>,
}

/// Publisher handle - cheap to clone, shared by every write-path caller
#[derive(Debug, Clone)]
pub struct EventBroker {
    created_tx: mpsc::Sender<Vec<u8>>,
    updated_tx: mpsc::Sender<Vec<u8>>,
    deleted_tx: mpsc::Sender<Vec<u8>>,
    views_tx: mpsc::Sender<Vec<u8>>,
    buys_tx: mpsc::Sender<Vec<u8>>,
    shutdown_token: CancellationToken,
}

impl EventBroker {
    /// Create the broker and its receiver set
    ///
    /// `capacity` bounds each topic channel independently.
    pub fn new(capacity: usize) -> (Self, TopicReceivers) {
        let (created_tx, created) = mpsc::channel(capacity);
        let (updated_tx, updated) = mpsc::channel(capacity);
        let (deleted_tx, deleted) = mpsc::channel(capacity);
        let (views_tx, views_incremented) = mpsc::channel(capacity);
        let (buys_tx, buys_incremented) = mpsc::channel(capacity);

        let broker = Self {
            created_tx,
            updated_tx,
            deleted_tx,
            views_tx,
            buys_tx,
            shutdown_token: CancellationToken::new(),
        };

        let receivers = TopicReceivers {
            created,
            updated,
            deleted,
            views_incremented,
            buys_incremented,
        };

        (broker, receivers)
    }

    /// Publish a message body on the given topic
    ///
    /// Blocks while the topic channel is full; errors when the consumer side
    /// is gone (the store mutation preceding this call is NOT rolled back).
    pub async fn publish(&self, topic: ProductTopic, body: Vec<u8>) -> RepoResult<()> {
        let sender = match topic {
            ProductTopic::Created => &self.created_tx,
            ProductTopic::Updated => &self.updated_tx,
            ProductTopic::Deleted => &self.deleted_tx,
            ProductTopic::ViewsIncremented => &self.views_tx,
            ProductTopic::BuysIncremented => &self.buys_tx,
        };

        sender.send(body).await.map_err(|_| {
            RepoError::Unavailable(format!("Event channel closed for topic {}", topic))
        })
    }

    /// Token observed by the dispatcher for graceful shutdown
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Signal the consumption loop to stop
    pub fn shutdown(&self) {
        tracing::info!("Shutting down event broker");
        self.shutdown_token.cancel();
    }
}
