//! Routing table seam
//!
//! The routing table owns the registry of models, vector stores and vector
//! DBs, and maps each provider id to its implementation.

use std::sync::Arc;

use async_trait::async_trait;

use super::provider::VectorIoProvider;
use crate::core::error::Result;
use crate::core::types::{
    Model, SearchRequest, SearchResponsePage, UpdateVectorStoreRequest, VectorDb, VectorStore,
    VectorStoreObject, VectorStoreRegistration,
};

/// Kind of routable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Model,
    VectorStore,
    VectorDb,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Model => write!(f, "model"),
            ObjectKind::VectorStore => write!(f, "vector_store"),
            ObjectKind::VectorDb => write!(f, "vector_db"),
        }
    }
}

/// An object held by the routing table
#[derive(Debug, Clone, PartialEq)]
pub enum RoutableObject {
    Model(Model),
    VectorStore(VectorStore),
    VectorDb(VectorDb),
}

impl RoutableObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            RoutableObject::Model(_) => ObjectKind::Model,
            RoutableObject::VectorStore(_) => ObjectKind::VectorStore,
            RoutableObject::VectorDb(_) => ObjectKind::VectorDb,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            RoutableObject::Model(m) => &m.identifier,
            RoutableObject::VectorStore(s) => &s.identifier,
            RoutableObject::VectorDb(d) => &d.identifier,
        }
    }

    pub fn provider_id(&self) -> &str {
        match self {
            RoutableObject::Model(m) => &m.provider_id,
            RoutableObject::VectorStore(s) => &s.provider_id,
            RoutableObject::VectorDb(d) => &d.provider_id,
        }
    }

    pub fn into_model(self) -> Option<Model> {
        match self {
            RoutableObject::Model(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_vector_store(self) -> Option<VectorStore> {
        match self {
            RoutableObject::VectorStore(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_vector_db(self) -> Option<VectorDb> {
        match self {
            RoutableObject::VectorDb(d) => Some(d),
            _ => None,
        }
    }
}

/// Registry and provider lookup used by the router
#[async_trait]
pub trait RoutingTable: Send + Sync {
    /// Look up an object by kind and identifier
    async fn get_object_by_identifier(
        &self,
        kind: ObjectKind,
        identifier: &str,
    ) -> Result<Option<RoutableObject>>;

    /// All objects of a kind
    async fn get_all_with_type(&self, kind: ObjectKind) -> Result<Vec<RoutableObject>>;

    /// Register a logical vector store and bind it to its provider
    async fn register_vector_store(
        &self,
        registration: VectorStoreRegistration,
    ) -> Result<VectorStore>;

    /// Remove a logical vector store
    async fn unregister_vector_store(&self, vector_store_id: &str) -> Result<()>;

    /// Register a vector DB
    async fn register_vector_db(&self, vector_db: VectorDb) -> Result<VectorDb>;

    /// Provider implementation for a provider id
    async fn get_provider_impl(&self, provider_id: &str) -> Result<Arc<dyn VectorIoProvider>>;

    /// Registered provider ids
    fn provider_ids(&self) -> Vec<String>;

    /// Search a vector store through its provider
    async fn openai_search_vector_store(
        &self,
        vector_store_id: &str,
        request: SearchRequest,
    ) -> Result<SearchResponsePage>;

    /// Update a vector store through its provider
    async fn openai_update_vector_store(
        &self,
        vector_store_id: &str,
        request: UpdateVectorStoreRequest,
    ) -> Result<VectorStoreObject>;
}
