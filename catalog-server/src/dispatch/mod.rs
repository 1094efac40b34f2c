//! Event dispatcher - background index synchronization loop
//!
//! Consumes the five topic channels through one multiplexed `select!` wait
//! and applies each event through the catalog sync handlers. Delivery is
//! at-least-once; application is at-most-once effort: a handler error is
//! logged and the loop advances, the message is not retried. The warmup
//! pass at startup is the reconciliation mechanism for whatever drift that
//! policy leaves behind.

use std::sync::Arc;

use shared::event::{decode, EventPayload};
use shared::ProductTopic;
use tokio_util::sync::CancellationToken;

use crate::broker::TopicReceivers;
use crate::services::CatalogService;
use crate::utils::{RepoError, RepoResult};

pub struct EventDispatcher {
    service: Arc<CatalogService>,
    receivers: TopicReceivers,
    shutdown_token: CancellationToken,
}

impl EventDispatcher {
    pub fn new(
        service: Arc<CatalogService>,
        receivers: TopicReceivers,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            service,
            receivers,
            shutdown_token,
        }
    }

    /// Consume events until shutdown is signalled
    ///
    /// Fairly multiplexed across topics; no cross-topic ordering guarantee.
    /// Closed channels leave the loop parked on the shutdown token; the
    /// service handed to the dispatcher keeps a broker clone alive, so the
    /// channels cannot all close while the loop runs.
    pub async fn run(mut self) {
        tracing::info!("Event dispatcher started");

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Event dispatcher shutting down");
                    break;
                }
                Some(body) = self.receivers.created.recv() => {
                    self.handle(ProductTopic::Created, body).await;
                }
                Some(body) = self.receivers.updated.recv() => {
                    self.handle(ProductTopic::Updated, body).await;
                }
                Some(body) = self.receivers.deleted.recv() => {
                    self.handle(ProductTopic::Deleted, body).await;
                }
                Some(body) = self.receivers.views_incremented.recv() => {
                    self.handle(ProductTopic::ViewsIncremented, body).await;
                }
                Some(body) = self.receivers.buys_incremented.recv() => {
                    self.handle(ProductTopic::BuysIncremented, body).await;
                }
            }
        }
    }

    /// Apply one event; failures are logged and the loop advances
    async fn handle(&self, topic: ProductTopic, body: Vec<u8>) {
        if let Err(err) = self.apply(topic, &body).await {
            tracing::error!(topic = %topic, error = %err, "Failed to apply event to index");
        } else {
            tracing::debug!(topic = %topic, "Applied event to index");
        }
    }

    async fn apply(&self, topic: ProductTopic, body: &[u8]) -> RepoResult<()> {
        match (topic, decode(topic, body)?) {
            (ProductTopic::Created, EventPayload::Product(product)) => {
                self.service.on_created(product).await
            }
            (ProductTopic::Updated, EventPayload::Product(product)) => {
                self.service.on_updated(product).await
            }
            (ProductTopic::Deleted, EventPayload::Id(id)) => self.service.on_deleted(&id).await,
            (ProductTopic::ViewsIncremented, EventPayload::Id(id)) => {
                self.service.on_views_incremented(&id).await
            }
            (ProductTopic::BuysIncremented, EventPayload::Id(id)) => {
                self.service.on_buys_incremented(&id).await
            }
            (topic, _) => Err(RepoError::Serialization(format!(
                "Payload shape does not match topic {}",
                topic
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::EventBroker;
    use crate::index::{LocalIndex, SearchIndex};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use shared::ProductCreate;
    use std::time::Duration;

    struct Harness {
        service: Arc<CatalogService>,
        index: Arc<LocalIndex>,
        broker: EventBroker,
    }

    fn spawn_dispatcher() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(LocalIndex::new());
        let (broker, receivers) = EventBroker::new(16);
        let service = Arc::new(CatalogService::new(store, index.clone(), broker.clone()));

        let dispatcher = EventDispatcher::new(
            service.clone(),
            receivers,
            broker.shutdown_token().clone(),
        );
        tokio::spawn(dispatcher.run());

        Harness {
            service,
            index,
            broker,
        }
    }

    async fn wait_until<F: Fn() -> bool>(condition: F) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 1s");
    }

    fn sample_create(name: &str) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: "dispatch test".into(),
            price: Decimal::new(1999, 2),
            category: "Misc".into(),
            tags: vec![],
            brand: "Acme".into(),
        }
    }

    #[tokio::test]
    async fn created_event_lands_in_the_index() {
        let h = spawn_dispatcher();
        let product = h.service.create_product(sample_create("Shoe")).await.unwrap();

        let index = h.index.clone();
        wait_until(move || index.len() == 1).await;
        assert_eq!(
            h.index.get(&product.id).await.unwrap().unwrap().name,
            "Shoe"
        );
    }

    #[tokio::test]
    async fn increment_event_resyncs_counters_from_the_store() {
        let h = spawn_dispatcher();
        let product = h.service.create_product(sample_create("Shoe")).await.unwrap();
        h.service.increment_views(&product.id).await.unwrap();
        h.service.increment_views(&product.id).await.unwrap();

        for _ in 0..100 {
            if let Some(doc) = h.index.get(&product.id).await.unwrap() {
                if doc.views == 2 {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("index counters never converged");
    }

    #[tokio::test]
    async fn delete_event_removes_the_document() {
        let h = spawn_dispatcher();
        let product = h.service.create_product(sample_create("Shoe")).await.unwrap();

        let index = h.index.clone();
        wait_until(move || index.len() == 1).await;

        h.service.delete_product(&product.id).await.unwrap();
        let index = h.index.clone();
        wait_until(move || index.is_empty()).await;
    }

    #[tokio::test]
    async fn handler_failure_does_not_stall_the_loop() {
        let h = spawn_dispatcher();

        // Increment for an id the store does not know: the resync handler
        // fails, is logged, and the dispatcher keeps consuming
        h.broker
            .publish(ProductTopic::ViewsIncremented, b"ghost".to_vec())
            .await
            .unwrap();

        let product = h.service.create_product(sample_create("Shoe")).await.unwrap();
        let index = h.index.clone();
        wait_until(move || index.len() == 1).await;
        assert!(h.index.get(&product.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn shutdown_token_stops_the_loop() {
        let h = spawn_dispatcher();
        let product = h.service.create_product(sample_create("Shoe")).await.unwrap();
        let index = h.index.clone();
        wait_until(move || index.len() == 1).await;

        h.broker.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Events published after shutdown are no longer applied
        h.service.delete_product(&product.id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(h.index.len(), 1);
    }

    #[tokio::test]
    async fn idle_loop_parks_and_exits_only_on_shutdown() {
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(LocalIndex::new());
        let (broker, receivers) = EventBroker::new(4);
        let service = Arc::new(CatalogService::new(store, index, broker.clone()));
        let dispatcher = EventDispatcher::new(
            service,
            receivers,
            broker.shutdown_token().clone(),
        );
        let handle = tokio::spawn(dispatcher.run());

        // No traffic at all; the loop stays parked instead of returning
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        broker.shutdown();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
