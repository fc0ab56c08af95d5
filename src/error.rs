//! Error types for the delight-rank library.

use thiserror::Error;

/// Errors surfaced by pipeline components.
///
/// External-service and clustering failures are recoverable by design: the
/// pipeline catches them at the call site and degrades (generic labels,
/// zero vectors, empty frequency table) instead of aborting the run.
#[derive(Debug, Error)]
pub enum DelightError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("embedding response shape mismatch: expected {expected} vectors, got {got}")]
    EmbeddingShape { expected: usize, got: usize },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("non-finite distance between embeddings {left} and {right}")]
    NonFiniteDistance { left: usize, right: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DelightError>;
