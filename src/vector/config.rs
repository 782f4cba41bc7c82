//! In-memory provider configuration

use serde::{Deserialize, Serialize};

/// Distance metric for vector similarity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// Cosine similarity (normalized dot product)
    #[default]
    Cosine,
    /// Euclidean distance (L2)
    Euclidean,
    /// Dot product (inner product)
    Dot,
}

/// Configuration for `InMemoryVectorIoProvider`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryProviderConfig {
    /// Provider id reported on created stores
    #[serde(default = "default_provider_id")]
    pub provider_id: String,

    /// Similarity metric for vector queries
    #[serde(default)]
    pub distance: Distance,
}

fn default_provider_id() -> String {
    "inline::memory".to_string()
}

impl Default for InMemoryProviderConfig {
    fn default() -> Self {
        Self {
            provider_id: default_provider_id(),
            distance: Distance::default(),
        }
    }
}

impl InMemoryProviderConfig {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            ..Default::default()
        }
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }
}
