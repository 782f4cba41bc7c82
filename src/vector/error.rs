//! Vector index error types

use thiserror::Error;

/// Errors raised by in-process vector indexes and providers
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: u64, actual: u64 },

    #[error("Chunk '{chunk_id}' has no embedding")]
    MissingEmbedding { chunk_id: String },

    #[error("Vector mode query requires a query embedding")]
    MissingQueryEmbedding,

    #[error("Index '{name}' has been deleted")]
    IndexDeleted { name: String },

    #[error("Collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("Collection already exists: {name}")]
    CollectionExists { name: String },

    #[error("Invalid filter: {reason}")]
    InvalidFilter { reason: String },
}

impl VectorError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Get suggested retry delay in milliseconds
    pub fn retry_delay_ms(&self) -> Option<u64> {
        None
    }
}

impl From<crate::filter::FilterError> for VectorError {
    fn from(err: crate::filter::FilterError) -> Self {
        VectorError::InvalidFilter {
            reason: err.to_string(),
        }
    }
}
