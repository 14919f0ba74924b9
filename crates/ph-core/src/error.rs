//! Error types for Policy Helper

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the retrieval engine and its callers.
///
/// Every variant describes a condition the caller can recover from; the engine
/// itself never retries, since retrying a deterministic call reproduces the failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),

    #[error("Shape mismatch: {vectors} vectors but {metas} metadata entries")]
    ShapeMismatch { vectors: usize, metas: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Document source error: {0}")]
    DocumentSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
