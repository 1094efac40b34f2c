//! Catalog Server - transactional product catalog with a ranked search copy
//!
//! # Architecture overview
//!
//! Writes go to the authoritative primary store first; on success an event is
//! published per topic and a background dispatcher applies it to the
//! denormalized search index. Search traffic never touches the primary store.
//!
//! ```text
//! HTTP write ──► CatalogService ──► ProductStore (authoritative)
//!                      │
//!                      └──► EventBroker ──► EventDispatcher ──► SearchIndex
//!
//! HTTP search ──► query builder ──► SearchIndex (ranked, paginated)
//! ```
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # Config, server state
//! ├── utils/         # Errors, logger
//! ├── store/         # Primary store adapter (SurrealDB / in-memory)
//! ├── index/         # Query builder + local search index
//! ├── broker/        # Per-topic event transport
//! ├── services/      # Catalog service (write path + sync-apply path)
//! ├── dispatch/      # Event consumption loop
//! └── api/           # HTTP routes and handlers
//! ```

pub mod api;
pub mod broker;
pub mod core;
pub mod dispatch;
pub mod index;
pub mod services;
pub mod store;
pub mod utils;

// Re-export public types
pub use broker::{EventBroker, TopicReceivers};
pub use core::{Config, ServerState};
pub use dispatch::EventDispatcher;
pub use index::{LocalIndex, SearchIndex};
pub use services::CatalogService;
pub use store::{MemoryStore, ProductStore, SurrealStore};
pub use utils::{AppError, AppResult, RepoError, RepoResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
