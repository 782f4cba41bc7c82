//! In-process vector I/O provider
//!
//! Vector stores and vector DBs share one index map keyed by provider
//! resource id, so chunks inserted through either API are searchable
//! through both.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::config::InMemoryProviderConfig;
use super::error::VectorError;
use super::index::InMemoryIndex;
use crate::core::error::{Result, RouterError};
use crate::core::types::{
    Chunk, CreateVectorStoreRequest, QueryChunksResponse, QueryParams, SearchMode, SearchRequest,
    SearchResponsePage, SearchResult, UpdateVectorStoreRequest, VectorDb, VectorStore,
    VectorStoreObject,
};
use crate::routing::{EmbeddingIndex, VectorIoProvider};

/// Vector I/O provider backed by `InMemoryIndex`
pub struct InMemoryVectorIoProvider {
    config: InMemoryProviderConfig,

    /// Indexes keyed by provider resource id
    indexes: RwLock<HashMap<String, Arc<InMemoryIndex>>>,

    /// Store objects keyed by provider resource id
    stores: RwLock<HashMap<String, VectorStoreObject>>,
}

impl InMemoryVectorIoProvider {
    pub fn new(config: InMemoryProviderConfig) -> Self {
        Self {
            config,
            indexes: RwLock::new(HashMap::new()),
            stores: RwLock::new(HashMap::new()),
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.config.provider_id
    }

    /// Index registered under a resource id
    pub async fn index(&self, resource_id: &str) -> Option<Arc<InMemoryIndex>> {
        self.indexes.read().await.get(resource_id).cloned()
    }

    /// Number of store objects held
    pub async fn store_count(&self) -> usize {
        self.stores.read().await.len()
    }

    async fn get_or_create_index(&self, resource_id: &str, dimension: u32) -> Arc<InMemoryIndex> {
        let mut indexes = self.indexes.write().await;
        if let Some(existing) = indexes.get(resource_id) {
            if !existing.is_deleted() {
                return Arc::clone(existing);
            }
        }

        let index = Arc::new(InMemoryIndex::new(
            resource_id,
            dimension as usize,
            self.config.distance,
        ));
        indexes.insert(resource_id.to_string(), Arc::clone(&index));
        debug!(provider = %self.config.provider_id, resource_id, dimension, "Created index");
        index
    }

    async fn require_index(
        &self,
        resource_id: &str,
    ) -> std::result::Result<Arc<InMemoryIndex>, VectorError> {
        self.index(resource_id)
            .await
            .ok_or_else(|| VectorError::CollectionNotFound {
                name: resource_id.to_string(),
            })
    }
}

impl Default for InMemoryVectorIoProvider {
    fn default() -> Self {
        Self::new(InMemoryProviderConfig::default())
    }
}

#[async_trait]
impl VectorIoProvider for InMemoryVectorIoProvider {
    async fn register_vector_store(&self, vector_store: &VectorStore) -> Result<()> {
        self.get_or_create_index(
            &vector_store.provider_resource_id,
            vector_store.embedding_dimension,
        )
        .await;
        Ok(())
    }

    async fn unregister_vector_store(&self, vector_store_id: &str) -> Result<()> {
        self.stores.write().await.remove(vector_store_id);
        let index = self.indexes.write().await.remove(vector_store_id);
        if let Some(index) = index {
            index.clear().await;
        }
        info!(provider = %self.config.provider_id, vector_store_id, "Unregistered vector store");
        Ok(())
    }

    async fn openai_create_vector_store(
        &self,
        request: CreateVectorStoreRequest,
    ) -> Result<VectorStoreObject> {
        let resource_id = request
            .provider_vector_store_id
            .clone()
            .ok_or_else(|| RouterError::InvalidRequest {
                reason: "provider_vector_store_id is required".to_string(),
            })?;
        let dimension = request
            .embedding_dimension
            .ok_or_else(|| RouterError::InvalidRequest {
                reason: "embedding_dimension is required".to_string(),
            })?;

        let mut stores = self.stores.write().await;
        if stores.contains_key(&resource_id) {
            return Err(VectorError::CollectionExists { name: resource_id }.into());
        }

        self.get_or_create_index(&resource_id, dimension).await;

        let object = VectorStoreObject::new(resource_id.clone(), request.name, request.metadata);
        stores.insert(resource_id, object.clone());
        Ok(object)
    }

    async fn openai_update_vector_store(
        &self,
        vector_store_id: &str,
        request: UpdateVectorStoreRequest,
    ) -> Result<VectorStoreObject> {
        let mut stores = self.stores.write().await;
        let object = stores
            .get_mut(vector_store_id)
            .ok_or_else(|| VectorError::CollectionNotFound {
                name: vector_store_id.to_string(),
            })?;

        if let Some(name) = request.name {
            object.name = Some(name);
        }
        if let Some(metadata) = request.metadata {
            object.metadata = metadata;
        }
        Ok(object.clone())
    }

    async fn openai_search_vector_store(
        &self,
        vector_store_id: &str,
        request: SearchRequest,
    ) -> Result<SearchResponsePage> {
        let index = self.require_index(vector_store_id).await?;

        let params = QueryParams {
            max_chunks: request.max_num_results,
            score_threshold: request
                .ranking_options
                .as_ref()
                .and_then(|r| r.score_threshold)
                .unwrap_or(0.0),
            mode: SearchMode::Keyword,
            query_embedding: None,
            filters: request.filters.clone(),
        };
        let response = index.search(&request.query, &params).await?;

        let data = response
            .chunks
            .into_iter()
            .zip(response.scores)
            .map(|(chunk, score)| SearchResult {
                chunk_id: chunk.chunk_id(),
                score,
                attributes: chunk.metadata,
                content: chunk.content,
            })
            .collect();

        Ok(SearchResponsePage::new(request.query, data))
    }

    async fn register_vector_db(&self, vector_db: &VectorDb) -> Result<Arc<dyn EmbeddingIndex>> {
        let index: Arc<dyn EmbeddingIndex> = self
            .get_or_create_index(&vector_db.provider_resource_id, vector_db.embedding_dimension)
            .await;
        info!(
            provider = %self.config.provider_id,
            vector_db_id = %vector_db.identifier,
            "Registered vector DB"
        );
        Ok(index)
    }

    async fn insert_chunks(&self, vector_db_id: &str, chunks: Vec<Chunk>) -> Result<()> {
        let index = self.require_index(vector_db_id).await?;
        index.add_chunks(chunks).await?;
        Ok(())
    }

    async fn query_chunks(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryChunksResponse> {
        let index = self.require_index(vector_db_id).await?;
        Ok(index.search(query, params).await?)
    }
}
