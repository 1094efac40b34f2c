//! Primary store adapter - authoritative persistence for products
//!
//! The trait is the injection seam for the orchestrator: production uses the
//! embedded SurrealDB implementation, tests use [`MemoryStore`]. All mutual
//! exclusion for counters is delegated to the store's conditional update
//! primitive; no in-process locks are taken on the write path.

mod memory;
mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use async_trait::async_trait;
use shared::{Product, ProductCreate, ProductUpdate};

use crate::utils::RepoResult;

/// Point CRUD plus atomic conditional counter increments
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product: assigns the id (UUID v4) and both timestamps
    async fn create(&self, data: ProductCreate) -> RepoResult<Product>;

    /// Full replacement of the mutable fields; bumps `updated_at`.
    /// Counters are untouched. `NotFound` when the id is absent.
    async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product>;

    /// Remove by id. `NotFound` when the id is absent.
    async fn delete(&self, id: &str) -> RepoResult<()>;

    /// Point lookup. `NotFound` when the id is absent.
    async fn get(&self, id: &str) -> RepoResult<Product>;

    /// Every product, for index warmup
    async fn list_all(&self) -> RepoResult<Vec<Product>>;

    /// Atomic `views += 1`, conditional on the record existing.
    /// Incrementing a missing id is `NotFound`, never a silent create.
    async fn increment_views(&self, id: &str) -> RepoResult<Product>;

    /// Atomic `buys += 1`, same contract as [`increment_views`](Self::increment_views)
    async fn increment_buys(&self, id: &str) -> RepoResult<Product>;
}
