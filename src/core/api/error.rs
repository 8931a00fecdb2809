//! API Error Types
//!
//! Error taxonomy for the data acquisition layer. List-style sources recover
//! internally (fallback listing, hardcoded defaults) and never surface
//! `SourceUnavailable` to callers; per-entity fetches propagate `NotFound`
//! so the page fan-out can degrade that one slot.

use thiserror::Error;

/// Data acquisition errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("entity {id} not found (status {status})")]
    NotFound { id: u32, status: u16 },

    #[error("missing reference: {0}")]
    MissingReference(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for acquisition operations
pub type Result<T> = std::result::Result<T, ApiError>;
