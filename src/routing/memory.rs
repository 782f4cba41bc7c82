//! In-memory routing table
//!
//! Holds registries behind `parking_lot::RwLock` maps and a fixed provider
//! map supplied at construction. Locks are never held across an await.
//! Vector store ids are reserved before the provider is called, so two
//! concurrent registrations of one id cannot both reach the provider.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use super::provider::VectorIoProvider;
use super::table::{ObjectKind, RoutableObject, RoutingTable};
use crate::core::error::{Result, RouterError};
use crate::core::types::{
    Model, SearchRequest, SearchResponsePage, UpdateVectorStoreRequest, VectorDb, VectorStore,
    VectorStoreObject, VectorStoreRegistration,
};

/// Routing table kept entirely in process memory
#[derive(Default)]
pub struct InMemoryRoutingTable {
    providers: HashMap<String, Arc<dyn VectorIoProvider>>,
    models: RwLock<HashMap<String, Model>>,
    vector_stores: RwLock<HashMap<String, VectorStore>>,
    /// Vector store ids with a provider registration in flight
    pending_stores: Mutex<HashSet<String>>,
    vector_dbs: RwLock<HashMap<String, VectorDb>>,
}

impl InMemoryRoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider implementation
    pub fn with_provider(
        mut self,
        provider_id: impl Into<String>,
        provider: Arc<dyn VectorIoProvider>,
    ) -> Self {
        self.providers.insert(provider_id.into(), provider);
        self
    }

    /// Add a model
    pub fn with_model(self, model: Model) -> Self {
        self.register_model(model);
        self
    }

    /// Register or replace a model
    pub fn register_model(&self, model: Model) {
        self.models.write().insert(model.identifier.clone(), model);
    }

    fn provider(&self, provider_id: &str) -> Result<Arc<dyn VectorIoProvider>> {
        self.providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| RouterError::ProviderNotFound {
                provider_id: provider_id.to_string(),
            })
    }

    fn vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.vector_stores
            .read()
            .get(vector_store_id)
            .cloned()
            .ok_or_else(|| RouterError::VectorStoreNotFound {
                vector_store_id: vector_store_id.to_string(),
            })
    }
}

#[async_trait]
impl RoutingTable for InMemoryRoutingTable {
    async fn get_object_by_identifier(
        &self,
        kind: ObjectKind,
        identifier: &str,
    ) -> Result<Option<RoutableObject>> {
        let object = match kind {
            ObjectKind::Model => self
                .models
                .read()
                .get(identifier)
                .cloned()
                .map(RoutableObject::Model),
            ObjectKind::VectorStore => self
                .vector_stores
                .read()
                .get(identifier)
                .cloned()
                .map(RoutableObject::VectorStore),
            ObjectKind::VectorDb => self
                .vector_dbs
                .read()
                .get(identifier)
                .cloned()
                .map(RoutableObject::VectorDb),
        };
        Ok(object)
    }

    async fn get_all_with_type(&self, kind: ObjectKind) -> Result<Vec<RoutableObject>> {
        let objects = match kind {
            ObjectKind::Model => self
                .models
                .read()
                .values()
                .cloned()
                .map(RoutableObject::Model)
                .collect(),
            ObjectKind::VectorStore => self
                .vector_stores
                .read()
                .values()
                .cloned()
                .map(RoutableObject::VectorStore)
                .collect(),
            ObjectKind::VectorDb => self
                .vector_dbs
                .read()
                .values()
                .cloned()
                .map(RoutableObject::VectorDb)
                .collect(),
        };
        Ok(objects)
    }

    async fn register_vector_store(
        &self,
        registration: VectorStoreRegistration,
    ) -> Result<VectorStore> {
        let provider = self.provider(&registration.provider_id)?;
        {
            let mut pending = self.pending_stores.lock();
            if pending.contains(&registration.vector_store_id)
                || self
                    .vector_stores
                    .read()
                    .contains_key(&registration.vector_store_id)
            {
                return Err(RouterError::InvalidRequest {
                    reason: format!(
                        "Vector store '{}' is already registered",
                        registration.vector_store_id
                    ),
                });
            }
            pending.insert(registration.vector_store_id.clone());
        }

        let vector_store = VectorStore::from_registration(registration);
        let registered = provider.register_vector_store(&vector_store).await;

        let mut pending = self.pending_stores.lock();
        pending.remove(&vector_store.identifier);
        registered?;
        self.vector_stores
            .write()
            .insert(vector_store.identifier.clone(), vector_store.clone());
        drop(pending);

        info!(
            vector_store_id = %vector_store.identifier,
            provider_id = %vector_store.provider_id,
            "Registered vector store"
        );
        Ok(vector_store)
    }

    async fn unregister_vector_store(&self, vector_store_id: &str) -> Result<()> {
        let vector_store = self.vector_stores.write().remove(vector_store_id).ok_or_else(|| {
            RouterError::VectorStoreNotFound {
                vector_store_id: vector_store_id.to_string(),
            }
        })?;

        let provider = self.provider(&vector_store.provider_id)?;
        provider
            .unregister_vector_store(&vector_store.provider_resource_id)
            .await?;
        info!(vector_store_id, "Unregistered vector store");
        Ok(())
    }

    async fn register_vector_db(&self, vector_db: VectorDb) -> Result<VectorDb> {
        self.provider(&vector_db.provider_id)?;
        self.vector_dbs
            .write()
            .insert(vector_db.identifier.clone(), vector_db.clone());
        debug!(vector_db_id = %vector_db.identifier, "Registered vector DB");
        Ok(vector_db)
    }

    async fn get_provider_impl(&self, provider_id: &str) -> Result<Arc<dyn VectorIoProvider>> {
        self.provider(provider_id)
    }

    fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn openai_search_vector_store(
        &self,
        vector_store_id: &str,
        request: SearchRequest,
    ) -> Result<SearchResponsePage> {
        let vector_store = self.vector_store(vector_store_id)?;
        let provider = self.provider(&vector_store.provider_id)?;
        provider
            .openai_search_vector_store(&vector_store.provider_resource_id, request)
            .await
    }

    async fn openai_update_vector_store(
        &self,
        vector_store_id: &str,
        request: UpdateVectorStoreRequest,
    ) -> Result<VectorStoreObject> {
        let vector_store = self.vector_store(vector_store_id)?;
        let provider = self.provider(&vector_store.provider_id)?;
        let object = provider
            .openai_update_vector_store(&vector_store.provider_resource_id, request.clone())
            .await?;

        if let Some(entry) = self.vector_stores.write().get_mut(vector_store_id) {
            if let Some(name) = request.name {
                entry.vector_store_name = Some(name);
            }
            if let Some(metadata) = request.metadata {
                entry.metadata = metadata;
            }
        }
        Ok(object)
    }
}
