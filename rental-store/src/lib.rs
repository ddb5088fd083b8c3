//! Movie rental store: embedded document storage for customers, catalog,
//! stores and rentals
//!
//! # Module layout
//!
//! ```text
//! rental-store/src/
//! ├── core/          # configuration, environment setup
//! ├── db/            # SurrealDB connection, schema, migration
//! │   ├── models/    # documents, payloads, snapshot types
//! │   └── repository/# CRUD and business operations per aggregate
//! └── utils/         # logging, validation helpers
//! ```

pub mod core;
pub mod db;
pub mod utils;

pub use crate::core::{Config, setup_environment};
pub use db::DbService;
pub use db::repository::{RepoError, RepoResult};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
