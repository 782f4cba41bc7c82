//! Error types for the vector router
//!
//! Each subsystem has its own error enum; `RouterError` aggregates them so
//! router operations can use `?` on provider, filter and inference results
//! without rewrapping.

use thiserror::Error;

use crate::filter::FilterError;
use crate::inference::InferenceError;
use crate::vector::VectorError;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Main error type for the vector router
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Model '{model_id}' not found")]
    ModelNotFound { model_id: String },

    #[error("Model '{model_id}' is of type '{actual}' but '{expected}' is required")]
    ModelTypeMismatch {
        model_id: String,
        actual: String,
        expected: String,
    },

    #[error("Vector store '{vector_store_id}' not found")]
    VectorStoreNotFound { vector_store_id: String },

    #[error("Vector DB '{vector_db_id}' not found")]
    VectorDbNotFound { vector_db_id: String },

    #[error("Provider '{provider_id}' not found")]
    ProviderNotFound { provider_id: String },

    #[error("No vector_io providers available")]
    NoProvidersAvailable,

    #[error(
        "Multiple vector_io providers available, provider_id is required. Available providers: {}",
        .available.join(", ")
    )]
    AmbiguousProvider { available: Vec<String> },

    #[error(
        "provider_id cannot be changed after vector store creation (vector store '{vector_store_id}' uses '{current}', got '{requested}')"
    )]
    ImmutableProviderId {
        vector_store_id: String,
        current: String,
        requested: String,
    },

    #[error("Query rewriting is not available: {reason}")]
    RewriteUnavailable { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Provider '{provider_id}' failed: {reason}")]
    Provider { provider_id: String, reason: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse failed: {reason}")]
    ParseFailed { reason: String },

    #[error("Invalid config value: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseFailed {
            reason: err.to_string(),
        }
    }
}

/// Trait for error recovery strategies
pub trait ErrorRecovery {
    /// Check if the error is retryable
    fn is_retryable(&self) -> bool;

    /// Get suggested retry delay in milliseconds
    fn retry_delay_ms(&self) -> Option<u64>;

    /// Get recovery action suggestion
    fn recovery_action(&self) -> RecoveryAction;
}

/// Recovery action suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation
    Retry,
    /// Fix the request and resubmit
    FixRequest,
    /// Notify the operator
    NotifyUser,
    /// Abort the operation
    Abort,
}

impl ErrorRecovery for RouterError {
    fn is_retryable(&self) -> bool {
        match self {
            RouterError::Inference(e) => e.is_retryable(),
            RouterError::Vector(e) => e.is_retryable(),
            RouterError::Provider { .. } => true,
            _ => false,
        }
    }

    fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            RouterError::Inference(e) => e.retry_delay_ms(),
            RouterError::Vector(e) => e.retry_delay_ms(),
            RouterError::Provider { .. } => Some(1000),
            _ => None,
        }
    }

    fn recovery_action(&self) -> RecoveryAction {
        match self {
            RouterError::ModelNotFound { .. }
            | RouterError::ModelTypeMismatch { .. }
            | RouterError::VectorStoreNotFound { .. }
            | RouterError::VectorDbNotFound { .. }
            | RouterError::ProviderNotFound { .. }
            | RouterError::AmbiguousProvider { .. }
            | RouterError::ImmutableProviderId { .. }
            | RouterError::InvalidRequest { .. }
            | RouterError::Filter(_) => RecoveryAction::FixRequest,
            RouterError::NoProvidersAvailable
            | RouterError::RewriteUnavailable { .. }
            | RouterError::Config(_) => RecoveryAction::NotifyUser,
            RouterError::Inference(e) if e.is_retryable() => RecoveryAction::Retry,
            RouterError::Vector(e) if e.is_retryable() => RecoveryAction::Retry,
            RouterError::Provider { .. } => RecoveryAction::Retry,
            RouterError::Inference(_) | RouterError::Vector(_) => RecoveryAction::Abort,
        }
    }
}
