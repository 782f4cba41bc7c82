//! Model registry types

use serde::{Deserialize, Serialize};

use super::Metadata;

/// Metadata key holding the output dimension of an embedding model
pub const EMBEDDING_DIMENSION_KEY: &str = "embedding_dimension";

/// Kind of model registered in the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Chat / completion model
    Llm,
    /// Embedding model, the only kind a vector store may reference
    Embedding,
    /// Reranking model
    Rerank,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::Llm => write!(f, "llm"),
            ModelType::Embedding => write!(f, "embedding"),
            ModelType::Rerank => write!(f, "rerank"),
        }
    }
}

/// A model entry in the routing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Logical model identifier
    pub identifier: String,

    /// Provider serving the model
    pub provider_id: String,

    /// Identifier of the model inside the provider
    pub provider_resource_id: String,

    /// Model kind
    pub model_type: ModelType,

    /// Free-form metadata (e.g. `embedding_dimension`)
    #[serde(default)]
    pub metadata: Metadata,
}

impl Model {
    /// Create a model whose provider resource id equals its identifier
    pub fn new(
        identifier: impl Into<String>,
        provider_id: impl Into<String>,
        model_type: ModelType,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            provider_resource_id: identifier.clone(),
            identifier,
            provider_id: provider_id.into(),
            model_type,
            metadata: Metadata::new(),
        }
    }

    /// Create an embedding model with its output dimension recorded in metadata
    pub fn embedding(
        identifier: impl Into<String>,
        provider_id: impl Into<String>,
        dimension: u32,
    ) -> Self {
        let mut model = Self::new(identifier, provider_id, ModelType::Embedding);
        model
            .metadata
            .insert(EMBEDDING_DIMENSION_KEY.to_string(), dimension.into());
        model
    }

    /// Check whether this model can back a vector store
    pub fn is_embedding(&self) -> bool {
        self.model_type == ModelType::Embedding
    }

    /// Embedding dimension recorded in metadata, if any
    pub fn embedding_dimension(&self) -> Option<u32> {
        self.metadata
            .get(EMBEDDING_DIMENSION_KEY)
            .and_then(|v| v.as_u64())
            .and_then(|d| u32::try_from(d).ok())
    }
}

/// Model reference qualified by its provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedModel {
    pub provider_id: String,
    pub model_id: String,
}

impl QualifiedModel {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
        }
    }
}

impl std::fmt::Display for QualifiedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.model_id)
    }
}
