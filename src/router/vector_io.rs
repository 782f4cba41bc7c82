//! Vector I/O router
//!
//! Sits between the vector-store API and the registered providers:
//! validates embedding models, picks the provider for new stores, guards
//! provider immutability, optionally rewrites search queries, and caches
//! the index behind each vector DB.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::index_cache::IndexCache;
use super::rewrite::QueryRewriter;
use crate::core::config::{RouterConfig, VectorStoresConfig};
use crate::core::error::{Result, RouterError};
use crate::core::types::{
    Chunk, CreateVectorStoreRequest, Model, ModelType, QueryChunksResponse, QueryParams,
    RegisterVectorDbRequest, SearchRequest, SearchResponsePage, UpdateVectorStoreRequest,
    VectorDb, VectorStore, VectorStoreDeleteResponse, VectorStoreObject, VectorStoreRegistration,
};
use crate::inference::{InferenceApi, OpenAiCompatClient};
use crate::routing::{EmbeddingIndex, ObjectKind, RoutableObject, RoutingTable};

/// Prefix of generated vector store ids
pub const VECTOR_STORE_ID_PREFIX: &str = "vs_";

/// Routes vector I/O calls to providers
pub struct VectorIoRouter {
    /// Registry and provider lookup
    routing_table: Arc<dyn RoutingTable>,

    /// Store defaults and rewrite parameters
    config: VectorStoresConfig,

    /// Chat completion client for query rewriting
    inference: Option<Arc<dyn InferenceApi>>,

    /// vector DB id -> provider index
    index_cache: IndexCache,
}

impl VectorIoRouter {
    /// Create a router with default configuration and no inference client
    pub fn new(routing_table: Arc<dyn RoutingTable>) -> Self {
        Self {
            routing_table,
            config: VectorStoresConfig::default(),
            inference: None,
            index_cache: IndexCache::new(),
        }
    }

    /// Set vector store configuration
    pub fn with_config(mut self, config: VectorStoresConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the inference client used for query rewriting
    pub fn with_inference(mut self, inference: Arc<dyn InferenceApi>) -> Self {
        self.inference = Some(inference);
        self
    }

    /// Build a router from loaded configuration
    ///
    /// An OpenAI-compatible client is created when `inference` is configured.
    pub fn from_config(routing_table: Arc<dyn RoutingTable>, config: &RouterConfig) -> Result<Self> {
        config.validate()?;

        let mut router = Self::new(routing_table).with_config(config.vector_stores.clone());
        if let Some(inference) = &config.inference {
            let client = OpenAiCompatClient::new(inference.clone())?;
            router = router.with_inference(Arc::new(client));
        }

        info!(
            rewrite_enabled = router.rewrite_available(),
            default_provider = ?router.config.default_provider_id,
            "Vector I/O router initialized"
        );
        Ok(router)
    }

    pub fn config(&self) -> &VectorStoresConfig {
        &self.config
    }

    pub fn index_cache(&self) -> &IndexCache {
        &self.index_cache
    }

    /// Whether search requests may ask for query rewriting
    pub fn rewrite_available(&self) -> bool {
        self.config.rewrite_query_params.is_some() && self.inference.is_some()
    }

    // ========================================================================
    // Vector stores
    // ========================================================================

    /// Create a vector store
    ///
    /// All validation happens before the routing table or any provider sees
    /// the request. If the provider fails to create the store, the logical
    /// registration is rolled back.
    pub async fn openai_create_vector_store(
        &self,
        mut request: CreateVectorStoreRequest,
    ) -> Result<VectorStoreObject> {
        let model_id = self.resolve_embedding_model_id(request.embedding_model.as_deref())?;
        self.validate_embedding_model(&model_id).await?;
        let dimension = self
            .resolve_embedding_dimension(&model_id, request.embedding_dimension)
            .await?;
        let provider_id = self.select_provider(request.provider_id.as_deref())?;

        let vector_store_id = format!("{}{}", VECTOR_STORE_ID_PREFIX, Uuid::new_v4());
        debug!(
            vector_store_id = %vector_store_id,
            provider_id = %provider_id,
            embedding_model = %model_id,
            "Creating vector store"
        );

        let vector_store = self
            .routing_table
            .register_vector_store(VectorStoreRegistration {
                vector_store_id,
                embedding_model: model_id.clone(),
                embedding_dimension: dimension,
                provider_id,
                provider_vector_store_id: request.provider_vector_store_id.clone(),
                vector_store_name: request.name.clone(),
            })
            .await?;

        request.embedding_model = Some(model_id);
        request.embedding_dimension = Some(dimension);
        request.provider_id = Some(vector_store.provider_id.clone());
        request.provider_vector_store_id = Some(vector_store.provider_resource_id.clone());

        let created = match self.routing_table.get_provider_impl(&vector_store.provider_id).await {
            Ok(provider) => provider.openai_create_vector_store(request).await,
            Err(err) => Err(err),
        };

        match created {
            Ok(object) => {
                info!(
                    vector_store_id = %vector_store.identifier,
                    provider_id = %vector_store.provider_id,
                    "Created vector store"
                );
                Ok(object)
            }
            Err(err) => {
                warn!(
                    vector_store_id = %vector_store.identifier,
                    error = %err,
                    "Provider failed to create vector store, rolling back registration"
                );
                if let Err(rollback) = self
                    .routing_table
                    .unregister_vector_store(&vector_store.identifier)
                    .await
                {
                    warn!(
                        vector_store_id = %vector_store.identifier,
                        error = %rollback,
                        "Rollback of vector store registration failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Update a vector store's name or metadata
    ///
    /// The provider bound at creation cannot be changed.
    pub async fn openai_update_vector_store(
        &self,
        vector_store_id: &str,
        request: UpdateVectorStoreRequest,
    ) -> Result<VectorStoreObject> {
        let existing = self.lookup_vector_store(vector_store_id).await?;

        if let Some(requested) = request.requested_provider_id() {
            if requested.as_str() != Some(existing.provider_id.as_str()) {
                let requested = requested
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| requested.to_string());
                warn!(
                    vector_store_id,
                    current = %existing.provider_id,
                    requested = %requested,
                    "Rejected provider_id change"
                );
                return Err(RouterError::ImmutableProviderId {
                    vector_store_id: vector_store_id.to_string(),
                    current: existing.provider_id,
                    requested,
                });
            }
        }

        self.routing_table
            .openai_update_vector_store(vector_store_id, request)
            .await
    }

    /// Search a vector store, rewriting the query first when requested
    pub async fn openai_search_vector_store(
        &self,
        vector_store_id: &str,
        mut request: SearchRequest,
    ) -> Result<SearchResponsePage> {
        if !request.rewrite_query {
            return self
                .routing_table
                .openai_search_vector_store(vector_store_id, request)
                .await;
        }

        let rewriter = self.rewriter()?;
        let rewritten = rewriter.rewrite(&request.query).await?;

        request.query = rewritten.clone();
        request.rewrite_query = false;

        let mut page = self
            .routing_table
            .openai_search_vector_store(vector_store_id, request)
            .await?;
        page.search_query = rewritten;
        Ok(page)
    }

    /// Registry entry for a vector store
    pub async fn openai_retrieve_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.lookup_vector_store(vector_store_id).await
    }

    /// Delete a vector store from the registry and its provider
    pub async fn openai_delete_vector_store(
        &self,
        vector_store_id: &str,
    ) -> Result<VectorStoreDeleteResponse> {
        self.lookup_vector_store(vector_store_id).await?;
        self.routing_table
            .unregister_vector_store(vector_store_id)
            .await?;
        info!(vector_store_id, "Deleted vector store");
        Ok(VectorStoreDeleteResponse::deleted(vector_store_id))
    }

    // ========================================================================
    // Vector DBs
    // ========================================================================

    /// Register a vector DB
    pub async fn register_vector_db(&self, request: RegisterVectorDbRequest) -> Result<VectorDb> {
        let model_id = self.resolve_embedding_model_id(request.embedding_model.as_deref())?;
        self.validate_embedding_model(&model_id).await?;
        let dimension = self
            .resolve_embedding_dimension(&model_id, request.embedding_dimension)
            .await?;
        let provider_id = self.select_provider(request.provider_id.as_deref())?;

        let vector_db = VectorDb {
            provider_resource_id: request
                .provider_vector_db_id
                .unwrap_or_else(|| request.vector_db_id.clone()),
            identifier: request.vector_db_id,
            provider_id,
            embedding_model: model_id,
            embedding_dimension: dimension,
        };

        let registered = self.routing_table.register_vector_db(vector_db).await?;
        info!(
            vector_db_id = %registered.identifier,
            provider_id = %registered.provider_id,
            "Registered vector DB"
        );
        Ok(registered)
    }

    /// Drop the cached index for a vector DB and delete its data
    ///
    /// Does nothing when the vector DB has no cached index.
    pub async fn unregister_vector_db(&self, vector_db_id: &str) -> Result<()> {
        match self.index_cache.remove(vector_db_id).await {
            Some(index) => {
                index.delete().await?;
                info!(vector_db_id, "Unregistered vector DB");
            }
            None => debug!(vector_db_id, "Vector DB not cached, nothing to unregister"),
        }
        Ok(())
    }

    /// Insert chunks into a vector DB
    pub async fn insert_chunks(&self, vector_db_id: &str, chunks: Vec<Chunk>) -> Result<()> {
        let index = self.get_or_create_index(vector_db_id).await?;
        debug!(vector_db_id, count = chunks.len(), "Inserting chunks");
        index.insert_chunks(chunks).await
    }

    /// Query a vector DB
    pub async fn query_chunks(
        &self,
        vector_db_id: &str,
        query: &str,
        params: Option<QueryParams>,
    ) -> Result<QueryChunksResponse> {
        let index = self.get_or_create_index(vector_db_id).await?;
        let params = params.unwrap_or_default();
        index.query_chunks(query, &params).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn rewriter(&self) -> Result<QueryRewriter> {
        let params = self.config.rewrite_query_params.clone().ok_or_else(|| {
            RouterError::RewriteUnavailable {
                reason: "rewrite_query_params is not configured".to_string(),
            }
        })?;
        let inference = self
            .inference
            .clone()
            .ok_or_else(|| RouterError::RewriteUnavailable {
                reason: "no inference API is configured".to_string(),
            })?;
        Ok(QueryRewriter::new(params, inference))
    }

    fn resolve_embedding_model_id(&self, requested: Option<&str>) -> Result<String> {
        requested
            .map(str::to_string)
            .or_else(|| self.config.default_embedding_model.clone())
            .ok_or_else(|| RouterError::InvalidRequest {
                reason: "embedding_model is required and no default_embedding_model is configured"
                    .to_string(),
            })
    }

    async fn validate_embedding_model(&self, model_id: &str) -> Result<Model> {
        let model = self
            .routing_table
            .get_object_by_identifier(ObjectKind::Model, model_id)
            .await?
            .and_then(RoutableObject::into_model)
            .ok_or_else(|| RouterError::ModelNotFound {
                model_id: model_id.to_string(),
            })?;

        if !model.is_embedding() {
            return Err(RouterError::ModelTypeMismatch {
                model_id: model_id.to_string(),
                actual: model.model_type.to_string(),
                expected: ModelType::Embedding.to_string(),
            });
        }
        Ok(model)
    }

    async fn resolve_embedding_dimension(
        &self,
        model_id: &str,
        requested: Option<u32>,
    ) -> Result<u32> {
        if let Some(dimension) = requested {
            return Ok(dimension);
        }

        let models = self.routing_table.get_all_with_type(ObjectKind::Model).await?;
        models
            .into_iter()
            .filter_map(RoutableObject::into_model)
            .find(|m| m.identifier == model_id)
            .and_then(|m| m.embedding_dimension())
            .ok_or_else(|| RouterError::InvalidRequest {
                reason: format!(
                    "embedding_dimension is required: model '{}' does not declare one",
                    model_id
                ),
            })
    }

    fn select_provider(&self, requested: Option<&str>) -> Result<String> {
        let available = self.routing_table.provider_ids();

        if let Some(provider_id) = requested {
            if available.iter().any(|p| p == provider_id) {
                return Ok(provider_id.to_string());
            }
            return Err(RouterError::ProviderNotFound {
                provider_id: provider_id.to_string(),
            });
        }

        match available.len() {
            0 => Err(RouterError::NoProvidersAvailable),
            1 => {
                let provider_id = available.into_iter().next().unwrap_or_default();
                debug!(provider_id = %provider_id, "Auto-selected the only vector_io provider");
                Ok(provider_id)
            }
            _ => match &self.config.default_provider_id {
                Some(default) if available.contains(default) => {
                    debug!(provider_id = %default, "Using configured default vector_io provider");
                    Ok(default.clone())
                }
                Some(default) => Err(RouterError::ProviderNotFound {
                    provider_id: default.clone(),
                }),
                None => Err(RouterError::AmbiguousProvider { available }),
            },
        }
    }

    async fn lookup_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.routing_table
            .get_object_by_identifier(ObjectKind::VectorStore, vector_store_id)
            .await?
            .and_then(RoutableObject::into_vector_store)
            .ok_or_else(|| RouterError::VectorStoreNotFound {
                vector_store_id: vector_store_id.to_string(),
            })
    }

    async fn get_or_create_index(&self, vector_db_id: &str) -> Result<Arc<dyn EmbeddingIndex>> {
        let routing_table = Arc::clone(&self.routing_table);
        let key = vector_db_id.to_string();

        self.index_cache
            .get_or_try_init(vector_db_id, move || async move {
                let vector_db = routing_table
                    .get_object_by_identifier(ObjectKind::VectorDb, &key)
                    .await?
                    .and_then(RoutableObject::into_vector_db)
                    .ok_or_else(|| RouterError::VectorDbNotFound {
                        vector_db_id: key.clone(),
                    })?;

                let provider = routing_table.get_provider_impl(&vector_db.provider_id).await?;
                let index = provider.register_vector_db(&vector_db).await?;
                debug!(
                    vector_db_id = %key,
                    provider_id = %vector_db.provider_id,
                    "Cached vector DB index"
                );
                Ok::<_, RouterError>(index)
            })
            .await
    }
}
