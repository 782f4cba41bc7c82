//! Vector store search request and response types

use serde::{Deserialize, Serialize};

use super::{Filter, Metadata};

/// Search request against a vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub query: String,

    /// Optional filter expression
    #[serde(default)]
    pub filters: Option<Filter>,

    /// Maximum number of results
    #[serde(default = "default_max_num_results")]
    pub max_num_results: usize,

    /// Ranking options
    #[serde(default)]
    pub ranking_options: Option<RankingOptions>,

    /// Rewrite the query through a chat completion before searching
    #[serde(default)]
    pub rewrite_query: bool,
}

fn default_max_num_results() -> usize {
    10
}

impl SearchRequest {
    /// Create a plain search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: None,
            max_num_results: default_max_num_results(),
            ranking_options: None,
            rewrite_query: false,
        }
    }

    /// Request query rewriting
    pub fn with_rewrite(mut self) -> Self {
        self.rewrite_query = true;
        self
    }

    /// Attach a filter
    pub fn with_filters(mut self, filters: impl Into<Filter>) -> Self {
        self.filters = Some(filters.into());
        self
    }
}

/// Ranking options for a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingOptions {
    #[serde(default)]
    pub ranker: Option<String>,
    #[serde(default)]
    pub score_threshold: Option<f32>,
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: String,
    pub score: f32,
    #[serde(default)]
    pub attributes: Metadata,
    pub content: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponsePage {
    pub object: String,
    /// The query actually used, after any rewrite
    pub search_query: String,
    pub data: Vec<SearchResult>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl SearchResponsePage {
    pub fn new(search_query: impl Into<String>, data: Vec<SearchResult>) -> Self {
        Self {
            object: "vector_store.search_results.page".to_string(),
            search_query: search_query.into(),
            data,
            has_more: false,
            next_page: None,
        }
    }
}
