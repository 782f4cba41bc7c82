//! Chunk types for the chunk-level insert/query API
//!
//! A chunk is a unit of content stored in a vector DB. Its identity comes
//! from stored metadata when present, otherwise from a digest of the
//! document id and content, otherwise from a random UUID.

use serde::{Deserialize, Serialize};
use md5::{Digest, Md5};
use uuid::Uuid;

use super::Metadata;

/// Metadata key holding an explicit chunk id
pub const CHUNK_ID_KEY: &str = "chunk_id";

/// Metadata key holding the owning document id
pub const DOCUMENT_ID_KEY: &str = "document_id";

/// A unit of content stored in a vector DB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub content: String,

    /// Free-form metadata, filterable at query time
    #[serde(default)]
    pub metadata: Metadata,

    /// Precomputed embedding
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,

    /// System-level metadata
    #[serde(default)]
    pub chunk_metadata: Option<ChunkMetadata>,
}

impl Chunk {
    /// Create a chunk with empty metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
            embedding: None,
            chunk_metadata: None,
        }
    }

    /// Attach an embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Insert a metadata entry
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stable identifier for this chunk
    pub fn chunk_id(&self) -> String {
        extract_or_generate_chunk_id(self)
    }
}

/// System-level chunk metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub chunk_id: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub content_token_count: Option<u32>,
}

/// Retrieval mode for chunk queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Vector,
    Keyword,
}

/// Parameters for `query_chunks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Maximum number of chunks returned
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,

    /// Minimum score for a chunk to be returned
    #[serde(default)]
    pub score_threshold: f32,

    /// Retrieval mode
    #[serde(default)]
    pub mode: SearchMode,

    /// Query embedding, required in vector mode
    #[serde(default)]
    pub query_embedding: Option<Vec<f32>>,

    /// Optional metadata filter
    #[serde(default)]
    pub filters: Option<super::Filter>,
}

fn default_max_chunks() -> usize {
    3
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            max_chunks: default_max_chunks(),
            score_threshold: 0.0,
            mode: SearchMode::default(),
            query_embedding: None,
            filters: None,
        }
    }
}

/// Result of `query_chunks`: parallel lists of chunks and scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryChunksResponse {
    pub chunks: Vec<Chunk>,
    pub scores: Vec<f32>,
}

impl QueryChunksResponse {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Deterministic UUID-formatted id for `document_id` + `content`
///
/// The MD5 digest of `"<document_id>:<content>"` is used as the UUID bytes,
/// so ids match those produced by other vector I/O implementations.
pub fn generate_chunk_id(document_id: &str, content: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(document_id.as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    let digest: [u8; 16] = hasher.finalize().into();

    Uuid::from_bytes(digest).to_string()
}

/// Return the chunk's stored id, or derive one
pub fn extract_or_generate_chunk_id(chunk: &Chunk) -> String {
    if let Some(id) = chunk
        .chunk_metadata
        .as_ref()
        .and_then(|m| m.chunk_id.as_ref())
    {
        return id.clone();
    }

    if let Some(id) = chunk.metadata.get(CHUNK_ID_KEY).and_then(|v| v.as_str()) {
        return id.to_string();
    }

    let document_id = chunk
        .metadata
        .get(DOCUMENT_ID_KEY)
        .and_then(|v| v.as_str())
        .or_else(|| {
            chunk
                .chunk_metadata
                .as_ref()
                .and_then(|m| m.document_id.as_deref())
        });

    match document_id {
        Some(document_id) => generate_chunk_id(document_id, &chunk.content),
        None => {
            tracing::warn!("Chunk has no document_id, using random chunk id");
            Uuid::new_v4().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stored_chunk_id_wins() {
        let mut chunk = Chunk::new("hello").with_metadata(CHUNK_ID_KEY, "from-metadata");
        assert_eq!(chunk.chunk_id(), "from-metadata");

        chunk.chunk_metadata = Some(ChunkMetadata {
            chunk_id: Some("from-chunk-metadata".to_string()),
            ..Default::default()
        });
        assert_eq!(chunk.chunk_id(), "from-chunk-metadata");
    }

    #[test]
    fn test_document_id_yields_uuid() {
        let chunk = Chunk::new("hello").with_metadata(DOCUMENT_ID_KEY, "doc-1");
        let id = chunk.chunk_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(id, generate_chunk_id("doc-1", "hello"));
    }

    #[test]
    fn test_chunk_id_is_md5_uuid() {
        assert_eq!(
            generate_chunk_id("doc-1", "test"),
            "f68df25d-d9aa-ab4d-5684-64a233add20d"
        );
        assert_eq!(
            generate_chunk_id("existing-id", "test"),
            "84ededcc-b80b-a83e-1a20-ca6515a11350"
        );

        let mut ids: Vec<String> = ["test", "test ", "test 3"]
            .iter()
            .map(|content| generate_chunk_id("doc-1", content))
            .collect();
        ids.sort();
        assert_eq!(
            ids,
            vec![
                "177a1368-f6a8-0c50-6e92-18677f2c3de3",
                "bc744db3-1b25-0a9c-cdff-b6ba3df73c36",
                "f68df25d-d9aa-ab4d-5684-64a233add20d",
            ]
        );
    }

    #[test]
    fn test_missing_document_id_is_random() {
        let chunk = Chunk::new("hello");
        assert_ne!(chunk.chunk_id(), chunk.chunk_id());
    }

    #[test]
    fn test_query_params_defaults() {
        let params: QueryParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.max_chunks, 3);
        assert_eq!(params.score_threshold, 0.0);
        assert_eq!(params.mode, SearchMode::Vector);
    }

    proptest! {
        #[test]
        fn prop_chunk_id_is_deterministic(doc in ".{0,32}", content in ".{0,64}") {
            prop_assert_eq!(
                generate_chunk_id(&doc, &content),
                generate_chunk_id(&doc, &content)
            );
        }

        #[test]
        fn prop_chunk_id_depends_on_content(doc in "[a-z]{1,8}", a in "[a-z]{1,16}", b in "[a-z]{1,16}") {
            prop_assume!(a != b);
            prop_assert_ne!(generate_chunk_id(&doc, &a), generate_chunk_id(&doc, &b));
        }
    }
}
