//! Core data types for the vector router
//!
//! This module defines the entities and request/response shapes that flow
//! between the router, the routing table and the providers.

pub mod model;
pub mod vector_store;
pub mod vector_db;
pub mod chunk;
pub mod filter;
pub mod search;

/// Free-form metadata attached to stores, models and chunks
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// Re-export commonly used types
pub use model::{Model, ModelType, QualifiedModel};
pub use vector_store::{
    CreateVectorStoreRequest, UpdateVectorStoreRequest, VectorStore, VectorStoreDeleteResponse,
    VectorStoreObject, VectorStoreRegistration,
};
pub use vector_db::{RegisterVectorDbRequest, VectorDb};
pub use chunk::{
    Chunk, ChunkMetadata, QueryChunksResponse, QueryParams, SearchMode,
    extract_or_generate_chunk_id, generate_chunk_id,
};
pub use filter::{ComparisonFilter, CompoundFilter, CompoundOperator, Filter};
pub use search::{RankingOptions, SearchRequest, SearchResponsePage, SearchResult};
