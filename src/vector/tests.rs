//! Tests for the in-memory vector module

use super::*;
use crate::core::error::RouterError;
use crate::core::types::{
    Chunk, ComparisonFilter, CreateVectorStoreRequest, QueryParams, SearchMode, SearchRequest,
    UpdateVectorStoreRequest, VectorDb,
};
use crate::routing::{EmbeddingIndex, VectorIoProvider};
use proptest::prelude::*;
use serde_json::json;

/// Generate a random vector of the given dimension
fn random_vector(dim: usize) -> Vec<f32> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn vector_params(embedding: Vec<f32>, max_chunks: usize) -> QueryParams {
    QueryParams {
        max_chunks,
        query_embedding: Some(embedding),
        ..Default::default()
    }
}

fn keyword_params(max_chunks: usize) -> QueryParams {
    QueryParams {
        max_chunks,
        mode: SearchMode::Keyword,
        ..Default::default()
    }
}

fn doc_chunk(doc: &str, content: &str, embedding: Vec<f32>) -> Chunk {
    Chunk::new(content)
        .with_metadata("document_id", doc)
        .with_embedding(embedding)
}

// ============================================================================
// Index
// ============================================================================

#[tokio::test]
async fn test_insert_and_vector_query() {
    let index = InMemoryIndex::new("db", 4, Distance::Cosine);

    index
        .add_chunks(vec![
            doc_chunk("d1", "alpha", vec![1.0, 0.0, 0.0, 0.0]),
            doc_chunk("d1", "beta", vec![0.0, 1.0, 0.0, 0.0]),
            doc_chunk("d2", "gamma", vec![0.9, 0.1, 0.0, 0.0]),
        ])
        .await
        .unwrap();
    assert_eq!(index.count().await, 3);

    let response = index
        .search("", &vector_params(vec![1.0, 0.0, 0.0, 0.0], 2))
        .await
        .unwrap();

    assert_eq!(response.len(), 2);
    assert_eq!(response.chunks[0].content, "alpha");
    assert_eq!(response.chunks[1].content, "gamma");
    assert!(response.scores[0] >= response.scores[1]);
}

#[tokio::test]
async fn test_reinsert_same_chunk_replaces() {
    let index = InMemoryIndex::new("db", 2, Distance::Dot);
    let chunk = doc_chunk("d1", "same", vec![1.0, 0.0]);

    index.add_chunks(vec![chunk.clone()]).await.unwrap();
    index.add_chunks(vec![chunk]).await.unwrap();
    assert_eq!(index.count().await, 1);
}

#[tokio::test]
async fn test_dimension_validation() {
    let index = InMemoryIndex::new("db", 4, Distance::Cosine);

    let err = index
        .add_chunks(vec![
            doc_chunk("d1", "ok", vec![1.0, 0.0, 0.0, 0.0]),
            doc_chunk("d1", "bad", vec![1.0, 0.0]),
        ])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VectorError::InvalidDimension { expected: 4, actual: 2 }
    ));
    assert_eq!(index.count().await, 0, "batch must be all-or-nothing");

    let err = index
        .search("", &vector_params(vec![1.0; 3], 3))
        .await
        .unwrap_err();
    assert!(matches!(err, VectorError::InvalidDimension { .. }));
}

#[tokio::test]
async fn test_missing_embeddings() {
    let index = InMemoryIndex::new("db", 2, Distance::Cosine);

    let err = index.add_chunks(vec![Chunk::new("no vector")]).await.unwrap_err();
    assert!(matches!(err, VectorError::MissingEmbedding { .. }));

    let err = index.search("q", &QueryParams::default()).await.unwrap_err();
    assert!(matches!(err, VectorError::MissingQueryEmbedding));
}

#[tokio::test]
async fn test_keyword_query_and_threshold() {
    let index = InMemoryIndex::new("db", 2, Distance::Cosine);
    index
        .add_chunks(vec![
            doc_chunk("d", "Rust async runtime", vec![1.0, 0.0]),
            doc_chunk("d", "Python async io", vec![1.0, 0.0]),
            doc_chunk("d", "gardening tips", vec![1.0, 0.0]),
        ])
        .await
        .unwrap();

    let response = index.search("rust async", &keyword_params(10)).await.unwrap();
    assert_eq!(response.len(), 2);
    assert_eq!(response.chunks[0].content, "Rust async runtime");
    assert!((response.scores[0] - 1.0).abs() < f32::EPSILON);

    let mut params = keyword_params(10);
    params.score_threshold = 0.9;
    let response = index.search("rust async", &params).await.unwrap();
    assert_eq!(response.len(), 1);
}

#[tokio::test]
async fn test_query_with_filter() {
    let index = InMemoryIndex::new("db", 2, Distance::Cosine);
    index
        .add_chunks(vec![
            doc_chunk("d", "english text", vec![1.0, 0.0]).with_metadata("lang", "en"),
            doc_chunk("d", "german text", vec![1.0, 0.0]).with_metadata("lang", "de"),
        ])
        .await
        .unwrap();

    let mut params = keyword_params(10);
    params.filters = Some(ComparisonFilter::new("eq", "lang", "de").into());
    let response = index.search("text", &params).await.unwrap();
    assert_eq!(response.len(), 1);
    assert_eq!(response.chunks[0].content, "german text");

    params.filters = Some(ComparisonFilter::new("regex", "lang", "d.*").into());
    let err = index.search("text", &params).await.unwrap_err();
    assert!(err.to_string().contains("Unsupported comparison operator: regex"));
}

#[tokio::test]
async fn test_delete_index() {
    let index = InMemoryIndex::new("db", 2, Distance::Cosine);
    index
        .add_chunks(vec![doc_chunk("d", "x", vec![1.0, 0.0])])
        .await
        .unwrap();

    EmbeddingIndex::delete(&index).await.unwrap();
    assert!(index.is_deleted());
    assert_eq!(index.count().await, 0);

    let err = index.search("x", &keyword_params(1)).await.unwrap_err();
    assert!(matches!(err, VectorError::IndexDeleted { .. }));
}

#[test]
fn test_similarity_functions() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert!((euclidean_similarity(&[1.0, 1.0], &[1.0, 1.0]) - 1.0).abs() < 1e-6);
    assert!((dot_product(&[1.0, 2.0], &[3.0, 4.0]) - 11.0).abs() < 1e-6);
}

// ============================================================================
// Provider
// ============================================================================

#[tokio::test]
async fn test_provider_store_lifecycle() {
    let provider = InMemoryVectorIoProvider::new(InMemoryProviderConfig::new("inline::memory"));

    let request = CreateVectorStoreRequest {
        name: Some("docs".to_string()),
        embedding_dimension: Some(2),
        provider_vector_store_id: Some("vs_1".to_string()),
        ..Default::default()
    };
    let object = provider.openai_create_vector_store(request.clone()).await.unwrap();
    assert_eq!(object.id, "vs_1");
    assert_eq!(object.object, "vector_store");
    assert_eq!(object.name.as_deref(), Some("docs"));

    let err = provider.openai_create_vector_store(request).await.unwrap_err();
    assert!(matches!(
        err,
        RouterError::Vector(VectorError::CollectionExists { .. })
    ));

    provider
        .insert_chunks("vs_1", vec![doc_chunk("d", "hello world", vec![0.5, 0.5])])
        .await
        .unwrap();

    let page = provider
        .openai_search_vector_store("vs_1", SearchRequest::new("hello"))
        .await
        .unwrap();
    assert_eq!(page.search_query, "hello");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].content, "hello world");

    let updated = provider
        .openai_update_vector_store(
            "vs_1",
            UpdateVectorStoreRequest {
                name: Some("renamed".to_string()),
                metadata: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("renamed"));

    provider.unregister_vector_store("vs_1").await.unwrap();
    assert_eq!(provider.store_count().await, 0);
    assert!(provider.index("vs_1").await.is_none());
}

#[tokio::test]
async fn test_provider_vector_db_index_is_shared() {
    let provider = InMemoryVectorIoProvider::default();
    let db = VectorDb {
        identifier: "db_1".to_string(),
        provider_id: "inline::memory".to_string(),
        provider_resource_id: "db_1".to_string(),
        embedding_model: "all-MiniLM-L6-v2".to_string(),
        embedding_dimension: 3,
    };

    let first = provider.register_vector_db(&db).await.unwrap();
    first
        .insert_chunks(vec![doc_chunk("d", "shared", vec![1.0, 0.0, 0.0])])
        .await
        .unwrap();

    let second = provider.register_vector_db(&db).await.unwrap();
    let response = second
        .query_chunks("", &vector_params(vec![1.0, 0.0, 0.0], 3))
        .await
        .unwrap();
    assert_eq!(response.len(), 1);

    let response = provider
        .query_chunks("db_1", "shared", &keyword_params(3))
        .await
        .unwrap();
    assert_eq!(response.chunks[0].content, "shared");
}

#[tokio::test]
async fn test_provider_unknown_collection() {
    let provider = InMemoryVectorIoProvider::default();
    let err = provider
        .insert_chunks("missing", vec![doc_chunk("d", "x", vec![1.0])])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing"));

    let err = provider
        .openai_update_vector_store("missing", UpdateVectorStoreRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::Vector(VectorError::CollectionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_search_attributes_carry_metadata() {
    let provider = InMemoryVectorIoProvider::default();
    provider
        .openai_create_vector_store(CreateVectorStoreRequest {
            embedding_dimension: Some(2),
            provider_vector_store_id: Some("vs_attr".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    provider
        .insert_chunks(
            "vs_attr",
            vec![doc_chunk("doc-9", "tagged content", vec![1.0, 0.0]).with_metadata("tag", json!("x"))],
        )
        .await
        .unwrap();

    let page = provider
        .openai_search_vector_store("vs_attr", SearchRequest::new("tagged"))
        .await
        .unwrap();
    assert_eq!(page.data[0].attributes["tag"], "x");
    assert_eq!(
        page.data[0].chunk_id,
        crate::core::types::generate_chunk_id("doc-9", "tagged content")
    );
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Results come back ordered by descending score and never exceed the limit
    #[test]
    fn prop_query_results_ordered_by_score(num_chunks in 1usize..30, limit in 1usize..10) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let dim = 8usize;
            let index = InMemoryIndex::new("prop", dim, Distance::Cosine);
            let chunks = (0..num_chunks)
                .map(|i| doc_chunk("d", &format!("chunk {}", i), random_vector(dim)))
                .collect();
            index.add_chunks(chunks).await.unwrap();

            let mut params = vector_params(random_vector(dim), limit);
            params.score_threshold = -1.0;
            let response = index.search("", &params).await.unwrap();

            prop_assert_eq!(response.len(), num_chunks.min(limit));
            prop_assert_eq!(response.chunks.len(), response.scores.len());
            for pair in response.scores.windows(2) {
                prop_assert!(pair[0] >= pair[1]);
            }
            Ok(())
        })?;
    }
}
