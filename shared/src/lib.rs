//! Shared types for the movie rental store
//!
//! Storage-agnostic vocabulary used by the data-access layer: the closed
//! enums of the rental domain, unified error codes, and time/id helpers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
