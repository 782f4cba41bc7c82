//! Provider and index seams

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::{
    Chunk, CreateVectorStoreRequest, QueryChunksResponse, QueryParams, SearchRequest,
    SearchResponsePage, UpdateVectorStoreRequest, VectorDb, VectorStore, VectorStoreObject,
};

/// A vector storage backend
#[async_trait]
pub trait VectorIoProvider: Send + Sync {
    /// Bind a newly registered logical store to this provider
    async fn register_vector_store(&self, vector_store: &VectorStore) -> Result<()>;

    /// Drop a logical store
    async fn unregister_vector_store(&self, vector_store_id: &str) -> Result<()>;

    /// Create the provider-side store
    async fn openai_create_vector_store(
        &self,
        request: CreateVectorStoreRequest,
    ) -> Result<VectorStoreObject>;

    /// Update name / metadata of a store
    async fn openai_update_vector_store(
        &self,
        vector_store_id: &str,
        request: UpdateVectorStoreRequest,
    ) -> Result<VectorStoreObject>;

    /// Search a store
    async fn openai_search_vector_store(
        &self,
        vector_store_id: &str,
        request: SearchRequest,
    ) -> Result<SearchResponsePage>;

    /// Construct (or reopen) the index backing a vector DB
    async fn register_vector_db(&self, vector_db: &VectorDb) -> Result<Arc<dyn EmbeddingIndex>>;

    /// Insert chunks into a vector DB
    async fn insert_chunks(&self, vector_db_id: &str, chunks: Vec<Chunk>) -> Result<()>;

    /// Query a vector DB
    async fn query_chunks(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryChunksResponse>;
}

/// An embedding index handle
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    async fn insert_chunks(&self, chunks: Vec<Chunk>) -> Result<()>;

    async fn query_chunks(&self, query: &str, params: &QueryParams) -> Result<QueryChunksResponse>;

    /// Drop all data held by the index
    async fn delete(&self) -> Result<()>;
}
