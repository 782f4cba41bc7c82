//! Error types for the inference module

use thiserror::Error;

/// Inference-specific errors
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Chat completion API returned a non-success status
    #[error("Chat completion API error ({status}): {reason}")]
    ApiError { status: u16, reason: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// Completion carried no usable content
    #[error("Model '{model}' returned an empty completion")]
    EmptyResponse { model: String },

    /// Network error
    #[error("Network error: {reason}")]
    NetworkError { reason: String },

    /// Timeout error
    #[error("Inference timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl InferenceError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            InferenceError::RateLimitExceeded { .. }
            | InferenceError::NetworkError { .. }
            | InferenceError::Timeout { .. } => true,
            InferenceError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get suggested retry delay in milliseconds
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            InferenceError::RateLimitExceeded { retry_after_secs } => {
                Some(retry_after_secs.saturating_mul(1000))
            }
            InferenceError::NetworkError { .. } => Some(5000),
            InferenceError::Timeout { .. } => Some(1000),
            InferenceError::ApiError { status, .. } if *status >= 500 => Some(2000),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout { timeout_ms: 0 }
        } else if err.is_connect() {
            InferenceError::NetworkError {
                reason: format!("Connection failed: {}", err),
            }
        } else if err.is_decode() {
            InferenceError::SerializationError {
                reason: err.to_string(),
            }
        } else {
            InferenceError::NetworkError {
                reason: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        InferenceError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Result type for inference operations
pub type InferenceResult<T> = Result<T, InferenceError>;
