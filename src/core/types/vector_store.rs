//! Vector store types
//!
//! `VectorStore` is the registry entity owned by the routing table;
//! `VectorStoreObject` is the OpenAI-shaped object providers hand back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;

/// Metadata key that carries a provider id on update requests
pub const PROVIDER_ID_KEY: &str = "provider_id";

/// Logical vector store registered in the routing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStore {
    /// Logical identifier (`vs_...`)
    pub identifier: String,

    /// Provider bound at creation, never changes afterwards
    pub provider_id: String,

    /// Identifier of the store inside the provider
    pub provider_resource_id: String,

    /// Embedding model backing the store
    pub embedding_model: String,

    /// Embedding dimension
    pub embedding_dimension: u32,

    /// Human-readable name
    pub vector_store_name: Option<String>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl VectorStore {
    /// Build the registry entity from a registration request
    pub fn from_registration(registration: VectorStoreRegistration) -> Self {
        Self {
            provider_resource_id: registration
                .provider_vector_store_id
                .unwrap_or_else(|| registration.vector_store_id.clone()),
            identifier: registration.vector_store_id,
            provider_id: registration.provider_id,
            embedding_model: registration.embedding_model,
            embedding_dimension: registration.embedding_dimension,
            vector_store_name: registration.vector_store_name,
            metadata: Metadata::new(),
            created_at: Utc::now(),
        }
    }
}

/// Arguments for registering a vector store in the routing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreRegistration {
    pub vector_store_id: String,
    pub embedding_model: String,
    pub embedding_dimension: u32,
    pub provider_id: String,
    pub provider_vector_store_id: Option<String>,
    pub vector_store_name: Option<String>,
}

/// Create request for a vector store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVectorStoreRequest {
    /// Store name
    #[serde(default)]
    pub name: Option<String>,

    /// Embedding model identifier
    #[serde(default)]
    pub embedding_model: Option<String>,

    /// Embedding dimension; derived from the model when absent
    #[serde(default)]
    pub embedding_dimension: Option<u32>,

    /// Explicit provider; auto-selected when absent and unambiguous
    #[serde(default)]
    pub provider_id: Option<String>,

    /// Identifier the provider must use, filled in by the router after registration
    #[serde(default)]
    pub provider_vector_store_id: Option<String>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// Update request for a vector store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVectorStoreRequest {
    /// New name
    #[serde(default)]
    pub name: Option<String>,

    /// Replacement metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl UpdateVectorStoreRequest {
    /// The `provider_id` value present in metadata, of any JSON type
    pub fn requested_provider_id(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref().and_then(|m| m.get(PROVIDER_ID_KEY))
    }
}

/// OpenAI-compatible vector store object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreObject {
    pub id: String,
    #[serde(default = "default_object")]
    pub object: String,
    pub name: Option<String>,
    /// Unix timestamp in seconds
    pub created_at: i64,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub usage_bytes: u64,
}

fn default_object() -> String {
    "vector_store".to_string()
}

fn default_status() -> String {
    "completed".to_string()
}

impl VectorStoreObject {
    /// Create a completed store object
    pub fn new(id: impl Into<String>, name: Option<String>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            object: default_object(),
            name,
            created_at: Utc::now().timestamp(),
            metadata,
            status: default_status(),
            usage_bytes: 0,
        }
    }
}

/// Response to a vector store deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreDeleteResponse {
    pub id: String,
    pub object: String,
    pub deleted: bool,
}

impl VectorStoreDeleteResponse {
    pub fn deleted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "vector_store.deleted".to_string(),
            deleted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requested_provider_id() {
        let request: UpdateVectorStoreRequest = serde_json::from_value(json!({
            "name": "updated_name",
            "metadata": {"provider_id": "inline::sqlite"}
        }))
        .unwrap();
        assert_eq!(
            request.requested_provider_id(),
            Some(&json!("inline::sqlite"))
        );

        let request: UpdateVectorStoreRequest = serde_json::from_value(json!({
            "metadata": {"provider_id": null}
        }))
        .unwrap();
        assert_eq!(request.requested_provider_id(), Some(&json!(null)));

        let request = UpdateVectorStoreRequest {
            name: Some("n".to_string()),
            metadata: None,
        };
        assert_eq!(request.requested_provider_id(), None);
    }

    #[test]
    fn test_registration_defaults_provider_resource_id() {
        let store = VectorStore::from_registration(VectorStoreRegistration {
            vector_store_id: "vs_1".to_string(),
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_dimension: 384,
            provider_id: "inline::faiss".to_string(),
            provider_vector_store_id: None,
            vector_store_name: Some("docs".to_string()),
        });
        assert_eq!(store.provider_resource_id, "vs_1");
        assert_eq!(store.vector_store_name.as_deref(), Some("docs"));
    }

    #[test]
    fn test_create_request_accepts_minimal_json() {
        let request: CreateVectorStoreRequest =
            serde_json::from_value(json!({"embedding_model": "all-MiniLM-L6-v2"})).unwrap();
        assert_eq!(request.embedding_model.as_deref(), Some("all-MiniLM-L6-v2"));
        assert!(request.provider_id.is_none());
        assert!(request.metadata.is_empty());
    }
}
