//! Service layer

mod catalog;

pub use catalog::CatalogService;
