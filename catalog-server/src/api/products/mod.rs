//! Product API module
//!
//! # Routes
//!
//! | Path                     | Method | Notes                          |
//! |--------------------------|--------|--------------------------------|
//! | /api/products            | POST   | create                         |
//! | /api/products/search     | GET    | ranked search (index copy)     |
//! | /api/products/{id}       | GET    | point read (primary store)     |
//! | /api/products/{id}       | PUT    | full replace of mutable fields |
//! | /api/products/{id}       | DELETE | delete                         |
//! | /api/products/{id}/views | POST   | conditional views += 1         |
//! | /api/products/{id}/buys  | POST   | conditional buys += 1          |

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/search", get(handler::search))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/views", post(handler::increment_views))
        .route("/{id}/buys", post(handler::increment_buys))
}
