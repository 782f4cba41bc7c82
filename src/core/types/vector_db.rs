//! Vector DB types used by the chunk-level insert/query API

use serde::{Deserialize, Serialize};

/// Long-lived vector database entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDb {
    pub identifier: String,
    pub provider_id: String,
    pub provider_resource_id: String,
    pub embedding_model: String,
    pub embedding_dimension: u32,
}

/// Registration request for a vector DB
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterVectorDbRequest {
    pub vector_db_id: String,
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default)]
    pub embedding_dimension: Option<u32>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_vector_db_id: Option<String>,
}
