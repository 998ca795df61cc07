//! # Error Types
//!
//! Errors raised while constructing core values from external input. The
//! matching engine itself does not fail on bad identity data; it skips the
//! affected criteria tiers instead. Errors here come from parsing records
//! and timestamps at the edges.

use thiserror::Error;

/// Top-level error type for prosecution case matching.
#[derive(Error, Debug)]
pub enum PcmError {
    /// A value did not match the shape required by its type.
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
