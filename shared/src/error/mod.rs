//! Unified error system for the rental store
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`AppError`]: Rich error type with code, message, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors (validation, conflicts, missing references)
//! - 9xxx: System errors (storage, configuration)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "rating must be within 1..=10");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let err = AppError::already_exists("Customer with email 'ava@example.com'")
//!     .with_detail("field", "email");
//! assert_eq!(err.code.code(), 4);
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
