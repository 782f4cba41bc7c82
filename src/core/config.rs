//! Router configuration
//!
//! JSON configuration covering:
//! - Vector store defaults (provider, embedding model)
//! - Query rewrite parameters
//! - Inference client connection
//! - Logging

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::types::QualifiedModel;
use crate::logging::LoggingConfig;

/// Default prompt used to rewrite search queries
pub const DEFAULT_QUERY_REWRITE_PROMPT: &str = "Expand this query with relevant synonyms and related terms. Return only the improved query, no explanations:\n\n{query}\n\nImproved query:";

/// Placeholder substituted with the original query
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Top-level router configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouterConfig {
    /// Vector store defaults
    #[serde(default)]
    pub vector_stores: VectorStoresConfig,

    /// Inference client used for query rewriting
    #[serde(default)]
    pub inference: Option<InferenceClientConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RouterConfig {
    /// Load and validate configuration from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded router configuration");
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(params) = &self.vector_stores.rewrite_query_params {
            params.validate()?;
        }
        if let Some(inference) = &self.inference {
            inference.validate()?;
        }
        Ok(())
    }
}

/// Vector store defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorStoresConfig {
    /// Provider used when several are registered and none is requested
    #[serde(default)]
    pub default_provider_id: Option<String>,

    /// Embedding model used when a request names none
    #[serde(default)]
    pub default_embedding_model: Option<String>,

    /// Query rewrite parameters; rewriting is unavailable when absent
    #[serde(default)]
    pub rewrite_query_params: Option<RewriteQueryParams>,
}

/// Query rewrite parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteQueryParams {
    /// Chat model used for rewriting
    pub model: QualifiedModel,

    /// Prompt template containing `{query}`
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Maximum tokens for the rewritten query
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_prompt() -> String {
    DEFAULT_QUERY_REWRITE_PROMPT.to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.3
}

impl RewriteQueryParams {
    /// Create parameters with the default prompt
    pub fn new(model: QualifiedModel) -> Self {
        Self {
            model,
            prompt: default_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Replace the prompt template
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Validate the parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.prompt.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "vector_stores.rewrite_query_params.prompt".to_string(),
                value: format!("missing {} placeholder", QUERY_PLACEHOLDER),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vector_stores.rewrite_query_params.max_tokens".to_string(),
                value: self.max_tokens.to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "vector_stores.rewrite_query_params.temperature".to_string(),
                value: self.temperature.to_string(),
            });
        }
        Ok(())
    }
}

/// Connection settings for an OpenAI-compatible inference endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceClientConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl InferenceClientConfig {
    /// Create a config without an API key
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "inference.base_url".to_string(),
                value: self.base_url.clone(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inference.timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_empty_config_defaults() {
        let config = RouterConfig::from_json_str("{}").unwrap();
        assert!(config.vector_stores.default_provider_id.is_none());
        assert!(config.vector_stores.rewrite_query_params.is_none());
        assert!(config.inference.is_none());
    }

    #[test]
    fn test_rewrite_params_defaults() {
        let config = RouterConfig::from_json_str(
            r#"{
                "vector_stores": {
                    "default_provider_id": "inline::faiss",
                    "rewrite_query_params": {
                        "model": {"provider_id": "test", "model_id": "llama"}
                    }
                },
                "inference": {"base_url": "http://localhost:8321/v1", "api_key": "sk-test"}
            }"#,
        )
        .unwrap();

        let params = config.vector_stores.rewrite_query_params.unwrap();
        assert_eq!(params.model.to_string(), "test/llama");
        assert_eq!(params.prompt, DEFAULT_QUERY_REWRITE_PROMPT);
        assert_eq!(params.max_tokens, 100);
        assert!((params.temperature - 0.3).abs() < f32::EPSILON);

        let inference = config.inference.unwrap();
        assert_eq!(inference.timeout_ms, 30_000);
        assert_eq!(
            inference.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
    }

    #[test]
    fn test_prompt_requires_placeholder() {
        let params = RewriteQueryParams::new(QualifiedModel::new("test", "llama"))
            .with_prompt("Rewrite this please");
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_temperature_and_tokens_bounds() {
        let mut params = RewriteQueryParams::new(QualifiedModel::new("test", "llama"));
        params.temperature = 2.5;
        assert!(params.validate().is_err());

        params.temperature = 0.0;
        params.max_tokens = 0;
        assert!(params.validate().is_err());

        params.max_tokens = 1;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = InferenceClientConfig::new("localhost:8321");
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"vector_stores": {{"default_embedding_model": "all-MiniLM-L6-v2"}}}}"#
        )
        .unwrap();

        let config = RouterConfig::load(file.path()).await.unwrap();
        assert_eq!(
            config.vector_stores.default_embedding_model.as_deref(),
            Some("all-MiniLM-L6-v2")
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = RouterConfig::load(dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
