//! LLM provider trait definition.

use super::types::{CompletionResponse, Message};
use crate::ai::api_key::ApiKeyError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling. `None` leaves the model default in place
    /// (some reasoning models reject anything else).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Ask the model for a single JSON object.
    pub json_response: bool,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: None,
            max_tokens: None,
            json_response: true,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

impl From<ApiKeyError> for LlmError {
    fn from(err: ApiKeyError) -> Self {
        match err {
            ApiKeyError::Timeout => LlmError::Timeout,
            ApiKeyError::CommandFailed(msg) => LlmError::Connection(msg),
        }
    }
}

/// Structured-completion capability.
///
/// Implementations connect to different LLM backends while providing a
/// unified interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider's name (e.g., "openai").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Complete a conversation.
    ///
    /// # Arguments
    /// * `messages` - The conversation history.
    /// * `options` - Completion options (JSON mode, timeout, etc.).
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;
}
