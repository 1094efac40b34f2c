//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`products`] - catalog CRUD, counters and ranked search

pub mod health;
pub mod products;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Compose the full route tree
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
}
