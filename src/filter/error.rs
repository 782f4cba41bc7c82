//! Filter translation error types

use thiserror::Error;

/// Errors raised while translating filter expressions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unsupported comparison operator: {operator}")]
    UnsupportedOperator { operator: String },

    #[error("Invalid value for '{operator}' on key '{key}': {reason}")]
    InvalidValue {
        operator: String,
        key: String,
        reason: String,
    },

    #[error("Invalid filter key: '{key}'")]
    InvalidKey { key: String },

    #[error("Compound '{operator}' filter has no nested filters")]
    EmptyCompound { operator: String },
}

/// Result type for filter translation
pub type FilterResult<T> = Result<T, FilterError>;
