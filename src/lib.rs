//! Vector Router - routing layer for vector store and vector DB APIs
//!
//! This crate provides:
//! - Embedding model validation and provider selection for new stores
//! - Provider immutability for existing stores
//! - LLM-based search query rewriting
//! - Per-vector-DB index caching with single registration under concurrency
//! - Metadata filter translation into provider-native expressions
//! - An in-memory routing table and vector provider

pub mod core;
pub mod filter;
pub mod inference;
pub mod logging;
pub mod router;
pub mod routing;
pub mod vector;

// Re-export commonly used items
pub use core::config::{RouterConfig, VectorStoresConfig};
pub use core::error::{Result, RouterError};
pub use router::VectorIoRouter;
pub use routing::{EmbeddingIndex, InMemoryRoutingTable, RoutingTable, VectorIoProvider};
pub use vector::{InMemoryVectorIoProvider, VectorError};
