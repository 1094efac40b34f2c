use std::sync::Arc;

use crate::core::Config;
use crate::services::CatalogService;

/// Server state - shared handles for every HTTP handler
///
/// Cloned per request by axum; `Arc` keeps the clone shallow. The catalog
/// service owns the injected store/index/broker handles, so no handler
/// reaches for an ambient client.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// Catalog service - write path, search path, sync-apply path
    pub catalog: Arc<CatalogService>,
}

impl ServerState {
    pub fn new(config: Config, catalog: Arc<CatalogService>) -> Self {
        Self { config, catalog }
    }
}
