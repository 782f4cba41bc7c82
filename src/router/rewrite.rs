//! Query rewriting through a chat completion

use std::sync::Arc;

use tracing::debug;

use crate::core::config::{RewriteQueryParams, QUERY_PLACEHOLDER};
use crate::core::error::Result;
use crate::inference::{ChatCompletionRequest, ChatMessage, InferenceApi, InferenceError};

/// Expands a search query with a language model
pub struct QueryRewriter {
    params: RewriteQueryParams,
    inference: Arc<dyn InferenceApi>,
}

impl QueryRewriter {
    pub fn new(params: RewriteQueryParams, inference: Arc<dyn InferenceApi>) -> Self {
        Self { params, inference }
    }

    /// Prompt with the query substituted for `{query}`
    pub fn build_prompt(&self, query: &str) -> String {
        self.params.prompt.replace(QUERY_PLACEHOLDER, query)
    }

    /// The single-message completion request sent for `query`
    pub fn build_request(&self, query: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.params.model.to_string(),
            messages: vec![ChatMessage::user(self.build_prompt(query))],
            max_tokens: Some(self.params.max_tokens),
            temperature: Some(self.params.temperature),
        }
    }

    /// Rewrite `query`; completion errors propagate unchanged
    pub async fn rewrite(&self, query: &str) -> Result<String> {
        let request = self.build_request(query);
        let model = request.model.clone();

        let response = self.inference.openai_chat_completion(request).await?;
        let rewritten = response
            .first_content()
            .map(str::trim)
            .unwrap_or_default();

        if rewritten.is_empty() {
            return Err(InferenceError::EmptyResponse { model }.into());
        }

        debug!(original = query, rewritten, model = %model, "Rewrote search query");
        Ok(rewritten.to_string())
    }
}
