//! Core module
//!
//! This module contains:
//! - Configuration management
//! - Error types and recovery hints
//! - Shared data types

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use error::{ConfigError, ErrorRecovery, RecoveryAction, Result, RouterError};
