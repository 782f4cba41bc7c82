//! Inference client for query rewriting
//!
//! This module provides the chat-completion seam used by the router:
//! - `InferenceApi`: the collaborator trait
//! - `OpenAiCompatClient`: HTTP client for OpenAI-compatible endpoints

mod client;
mod error;
mod openai;
mod types;

#[cfg(test)]
mod tests;

pub use client::InferenceApi;
pub use error::{InferenceError, InferenceResult};
pub use openai::OpenAiCompatClient;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ResponseMessage, Role,
    Usage,
};
