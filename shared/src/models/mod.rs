//! Domain vocabulary
//!
//! Closed value sets shared by every layer. Each enum serializes to the exact
//! literal the storage schema asserts against, and `FromStr` rejects anything
//! outside the set.

pub mod fee;
pub mod inventory;
pub mod membership;
pub mod rental;

// Re-exports
pub use fee::*;
pub use inventory::*;
pub use membership::*;
pub use rental::*;

use thiserror::Error;

/// A value outside one of the closed sets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
