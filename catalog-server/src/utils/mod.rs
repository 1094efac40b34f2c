//! Utility module - errors and logging

pub mod error;
pub mod logger;

pub use error::{ok, AppError, AppResponse, AppResult, RepoError, RepoResult};
