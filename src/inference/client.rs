//! Inference collaborator seam

use async_trait::async_trait;

use super::error::InferenceResult;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Chat-completion capable inference API
#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Run one chat completion
    async fn openai_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> InferenceResult<ChatCompletionResponse>;
}
