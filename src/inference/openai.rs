//! OpenAI-compatible chat completion client
//!
//! Posts to `<base_url>/chat/completions`. Rate limiting is reported
//! through `RateLimitExceeded` using the `Retry-After` header; the client
//! never retries on its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;

use super::client::InferenceApi;
use super::error::{InferenceError, InferenceResult};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::core::config::InferenceClientConfig;

/// Default wait when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for OpenAI-compatible endpoints
pub struct OpenAiCompatClient {
    /// HTTP client
    client: Client,

    /// Client configuration
    config: InferenceClientConfig,
}

impl OpenAiCompatClient {
    /// Create a new client
    pub fn new(config: InferenceClientConfig) -> InferenceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConfigError {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Chat completions endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl InferenceApi for OpenAiCompatClient {
    async fn openai_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> InferenceResult<ChatCompletionResponse> {
        tracing::debug!(model = %request.model, endpoint = %self.endpoint(), "Sending chat completion");

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request);

        if let Some(api_key) = &self.config.api_key {
            builder = builder.header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            );
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            tracing::warn!(retry_after, "Chat completion rate limited");
            return Err(InferenceError::RateLimitExceeded {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::ApiError {
                status: status.as_u16(),
                reason: body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "Chat completion finished");
        }

        Ok(completion)
    }
}
