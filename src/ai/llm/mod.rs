//! LLM provider abstraction layer.
//!
//! The audio pipelines only need one capability from a language model: take a
//! prompt and return a JSON document. [`LlmProvider`] models that, and
//! [`OpenAIProvider`] implements it for any OpenAI-compatible endpoint.

mod openai;
mod provider;
mod types;

pub use openai::{OpenAIProvider, OPENAI_API_BASE};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
