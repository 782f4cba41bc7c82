//! In-memory embedding index
//!
//! Brute-force index over chunks held in a `HashMap` keyed by chunk id.
//! Vector queries score every stored embedding with the configured
//! distance; keyword queries score by query-term overlap.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::config::Distance;
use super::error::VectorError;
use crate::core::error::Result;
use crate::core::types::{Chunk, QueryChunksResponse, QueryParams, SearchMode};
use crate::filter::{translate_filter, MetadataPredicate, MetadataPredicateTranslator};
use crate::routing::EmbeddingIndex;

/// Result type for index operations
pub type VectorResult<T> = std::result::Result<T, VectorError>;

/// Brute-force in-memory index
pub struct InMemoryIndex {
    /// Index name (vector DB or store id)
    name: String,

    /// Expected embedding dimension
    dimension: usize,

    /// Similarity metric
    distance: Distance,

    /// Stored chunks keyed by chunk id
    chunks: RwLock<HashMap<String, Chunk>>,

    /// Set once `delete` has run
    deleted: AtomicBool,
}

impl InMemoryIndex {
    /// Create an empty index
    pub fn new(name: impl Into<String>, dimension: usize, distance: Distance) -> Self {
        Self {
            name: name.into(),
            dimension,
            distance,
            chunks: RwLock::new(HashMap::new()),
            deleted: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Number of stored chunks
    pub async fn count(&self) -> usize {
        self.chunks.read().await.len()
    }

    fn ensure_live(&self) -> VectorResult<()> {
        if self.is_deleted() {
            return Err(VectorError::IndexDeleted {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Insert or replace chunks
    ///
    /// The batch is validated up front; nothing is stored if any chunk lacks
    /// an embedding or has the wrong dimension.
    pub async fn add_chunks(&self, chunks: Vec<Chunk>) -> VectorResult<usize> {
        self.ensure_live()?;

        let mut prepared = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let chunk_id = chunk.chunk_id();
            match &chunk.embedding {
                Some(embedding) => self.validate_vector_dimension(embedding)?,
                None => return Err(VectorError::MissingEmbedding { chunk_id }),
            }
            prepared.push((chunk_id, chunk));
        }

        let count = prepared.len();
        let mut stored = self.chunks.write().await;
        for (chunk_id, chunk) in prepared {
            stored.insert(chunk_id, chunk);
        }

        debug!(index = %self.name, count, "Inserted chunks");
        Ok(count)
    }

    /// Score, filter and rank stored chunks
    pub async fn search(&self, query: &str, params: &QueryParams) -> VectorResult<QueryChunksResponse> {
        self.ensure_live()?;

        let predicate: Option<MetadataPredicate> = params
            .filters
            .as_ref()
            .map(|f| translate_filter(&MetadataPredicateTranslator, f))
            .transpose()?;

        let query_embedding = match params.mode {
            SearchMode::Vector => {
                let embedding = params
                    .query_embedding
                    .as_deref()
                    .ok_or(VectorError::MissingQueryEmbedding)?;
                self.validate_vector_dimension(embedding)?;
                Some(embedding)
            }
            SearchMode::Keyword => None,
        };
        let query_terms = tokenize(query);

        let chunks = self.chunks.read().await;

        let mut scored: Vec<(f32, &Chunk)> = chunks
            .values()
            .filter(|chunk| predicate.as_ref().map_or(true, |p| p(&chunk.metadata)))
            .filter_map(|chunk| {
                let score = match query_embedding {
                    Some(q) => self.calculate_similarity(q, chunk.embedding.as_deref()?),
                    None => keyword_score(&query_terms, &chunk.content),
                };
                Some((score, chunk))
            })
            .filter(|(score, _)| match params.mode {
                SearchMode::Vector => *score >= params.score_threshold,
                SearchMode::Keyword => *score > 0.0 && *score >= params.score_threshold,
            })
            .collect();

        // Sort by score descending
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut response = QueryChunksResponse::default();
        for (score, chunk) in scored.into_iter().take(params.max_chunks) {
            response.scores.push(score);
            response.chunks.push(chunk.clone());
        }

        debug!(
            index = %self.name,
            results = response.len(),
            limit = params.max_chunks,
            "Query finished"
        );
        Ok(response)
    }

    /// Drop all chunks and mark the index deleted
    pub async fn clear(&self) -> usize {
        self.deleted.store(true, Ordering::SeqCst);
        let mut chunks = self.chunks.write().await;
        let count = chunks.len();
        chunks.clear();
        count
    }

    fn validate_vector_dimension(&self, vector: &[f32]) -> VectorResult<()> {
        let actual = vector.len();
        if actual != self.dimension {
            return Err(VectorError::InvalidDimension {
                expected: self.dimension as u64,
                actual: actual as u64,
            });
        }
        Ok(())
    }

    fn calculate_similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.distance {
            Distance::Cosine => cosine_similarity(a, b),
            Distance::Euclidean => euclidean_similarity(a, b),
            Distance::Dot => dot_product(a, b),
        }
    }
}

#[async_trait]
impl EmbeddingIndex for InMemoryIndex {
    async fn insert_chunks(&self, chunks: Vec<Chunk>) -> Result<()> {
        self.add_chunks(chunks).await?;
        Ok(())
    }

    async fn query_chunks(&self, query: &str, params: &QueryParams) -> Result<QueryChunksResponse> {
        Ok(self.search(query, params).await?)
    }

    async fn delete(&self) -> Result<()> {
        let removed = self.clear().await;
        debug!(index = %self.name, removed, "Deleted index");
        Ok(())
    }
}

/// Cosine similarity in [-1, 1]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Euclidean similarity `1 / (1 + distance)` in (0, 1]
pub fn euclidean_similarity(a: &[f32], b: &[f32]) -> f32 {
    let distance: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt();

    1.0 / (1.0 + distance)
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Fraction of query terms present in the content
fn keyword_score(query_terms: &HashSet<String>, content: &str) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let content_terms = tokenize(content);
    let hits = query_terms.intersection(&content_terms).count();
    hits as f32 / query_terms.len() as f32
}
