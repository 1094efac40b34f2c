//! Catalog Service - write-path orchestration and index synchronization
//!
//! Owns the injected store/index/broker handles. Two faces:
//!
//! - Write path (`create_product`, `update_product`, `delete_product`,
//!   `increment_views`, `increment_buys`): mutate the primary store first;
//!   a store failure aborts with no event published. On store success an
//!   event goes out on the matching topic; a publish failure surfaces to the
//!   caller but the store mutation stays - store durability wins over index
//!   freshness.
//! - Sync-apply path (`on_created`, `on_updated`, `on_deleted`,
//!   `on_views_incremented`, `on_buys_incremented`): invoked by the event
//!   dispatcher, writes only to the search index copy, never to the primary
//!   store. Every handler is idempotent under duplicate delivery.
//!
//! Increment events carry a bare id, so their handlers re-read the
//! authoritative counters and overwrite the whole index document. Replays
//! converge; concurrent increments resolve last-writer-wins, which is the
//! accepted weak-consistency trade-off.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::event::{encode_id, encode_product};
use shared::{Product, ProductCreate, ProductTopic, ProductUpdate, SearchParams};

use crate::broker::EventBroker;
use crate::index::{build_request, SearchIndex};
use crate::store::ProductStore;
use crate::utils::{RepoError, RepoResult};

pub struct CatalogService {
    store: Arc<dyn ProductStore>,
    index: Arc<dyn SearchIndex>,
    broker: EventBroker,
}

impl CatalogService {
    /// Create the service with its injected dependencies
    pub fn new(
        store: Arc<dyn ProductStore>,
        index: Arc<dyn SearchIndex>,
        broker: EventBroker,
    ) -> Self {
        Self {
            store,
            index,
            broker,
        }
    }

    /// Load every product from the primary store into the search index
    ///
    /// Run at startup; also the reconciliation hook for index drift left by
    /// failed sync applications.
    pub async fn warmup(&self) -> RepoResult<()> {
        let products = self.store.list_all().await?;
        let count = products.len();
        for product in products {
            self.index.upsert(product).await?;
        }
        tracing::info!("Catalog warmup: indexed {} products", count);
        Ok(())
    }

    // =========================================================================
    // Write path (store first, then publish)
    // =========================================================================

    pub async fn create_product(&self, data: ProductCreate) -> RepoResult<Product> {
        validate(&data.name, data.price)?;

        let product = self.store.create(data).await?;
        self.publish_product(ProductTopic::Created, &product).await?;
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        validate(&data.name, data.price)?;

        let product = self.store.update(id, data).await?;
        self.publish_product(ProductTopic::Updated, &product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> RepoResult<()> {
        self.store.delete(id).await?;
        self.broker
            .publish(ProductTopic::Deleted, encode_id(id))
            .await
    }

    /// Conditional `views += 1`; `NotFound` when the id is absent.
    ///
    /// The published payload is the bare id, not a delta: a delta would
    /// double-count under duplicate delivery. Not blindly retry-safe for the
    /// caller - a publish failure leaves the increment applied.
    pub async fn increment_views(&self, id: &str) -> RepoResult<Product> {
        let product = self.store.increment_views(id).await?;
        self.broker
            .publish(ProductTopic::ViewsIncremented, encode_id(id))
            .await?;
        Ok(product)
    }

    /// Conditional `buys += 1`, same contract as [`increment_views`](Self::increment_views)
    pub async fn increment_buys(&self, id: &str) -> RepoResult<Product> {
        let product = self.store.increment_buys(id).await?;
        self.broker
            .publish(ProductTopic::BuysIncremented, encode_id(id))
            .await?;
        Ok(product)
    }

    /// Point lookup against the authoritative store (read-your-writes)
    pub async fn get_product(&self, id: &str) -> RepoResult<Product> {
        self.store.get(id).await
    }

    /// Ranked search against the index copy
    pub async fn search_products(&self, params: &SearchParams) -> RepoResult<Vec<Product>> {
        self.index.search(build_request(params)).await
    }

    async fn publish_product(&self, topic: ProductTopic, product: &Product) -> RepoResult<()> {
        let body = encode_product(product)?;
        self.broker.publish(topic, body).await
    }

    // =========================================================================
    // Sync-apply path (index only, called by the dispatcher)
    // =========================================================================

    pub async fn on_created(&self, product: Product) -> RepoResult<()> {
        self.index.upsert(product).await
    }

    pub async fn on_updated(&self, product: Product) -> RepoResult<()> {
        self.index.upsert(product).await
    }

    /// Deleting an absent id is a no-op success
    pub async fn on_deleted(&self, id: &str) -> RepoResult<()> {
        self.index.remove(id).await
    }

    /// Re-read the authoritative record and overwrite the index copy.
    /// Fails when the id vanished (e.g. raced with a delete); the dispatcher
    /// logs that as drift.
    pub async fn on_views_incremented(&self, id: &str) -> RepoResult<()> {
        self.resync(id).await
    }

    pub async fn on_buys_incremented(&self, id: &str) -> RepoResult<()> {
        self.resync(id).await
    }

    async fn resync(&self, id: &str) -> RepoResult<()> {
        let product = self.store.get(id).await?;
        self.index.upsert(product).await
    }
}

/// Reject malformed input before any store call
fn validate(name: &str, price: Decimal) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if price < Decimal::ZERO {
        return Err(RepoError::Validation("price must be non-negative".into()));
    }
    Ok(())
}
