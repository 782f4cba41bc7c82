//! Vector I/O routing
//!
//! This module provides the entry point for vector store and vector DB calls:
//! - `VectorIoRouter`: validation, provider selection and dispatch
//! - `QueryRewriter`: LLM-based search query expansion
//! - `IndexCache`: per-vector-DB index memoisation

mod index_cache;
mod rewrite;
mod vector_io;


pub use index_cache::IndexCache;
pub use rewrite::QueryRewriter;
pub use vector_io::{VectorIoRouter, VECTOR_STORE_ID_PREFIX};
