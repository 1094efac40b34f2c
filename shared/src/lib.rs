//! Shared types for the catalog search-sync service
//!
//! Domain model and event wire formats used by both the HTTP write path and
//! the index synchronization worker.

pub mod event;
pub mod product;

// Re-exports
pub use event::{DecodeError, EventPayload, ProductTopic};
pub use product::{Product, ProductCreate, ProductUpdate, SearchParams, SortBy};
