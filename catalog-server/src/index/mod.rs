//! Search index adapter - denormalized, ranking-optimized product copy
//!
//! The index copy is written exclusively by the sync-apply path, never by
//! client calls. [`query`] builds a typed request from search parameters;
//! [`LocalIndex`] executes it in process. The trait is the seam where an
//! external engine would render the typed request to its own wire format.

mod local;
pub mod query;

pub use local::LocalIndex;
pub use query::{build_request, QueryClause, ScoreBoost, SearchRequest, SortSpec};

use async_trait::async_trait;
use shared::Product;

use crate::utils::RepoResult;

/// Upsert/delete by key plus ranked query execution
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Insert-or-overwrite keyed by product id (idempotent)
    async fn upsert(&self, product: Product) -> RepoResult<()>;

    /// Delete by id; removing an absent id is a no-op success
    async fn remove(&self, id: &str) -> RepoResult<()>;

    /// Point lookup on the index copy
    async fn get(&self, id: &str) -> RepoResult<Option<Product>>;

    /// Execute a ranked, paginated query
    async fn search(&self, request: SearchRequest) -> RepoResult<Vec<Product>>;
}
