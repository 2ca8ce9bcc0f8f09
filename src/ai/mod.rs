//! Clients for the upstream AI services.
//!
//! - `llm`: chat completion with JSON-mode responses (OpenAI-compatible)
//! - `speech`: speech-to-text transcription (OpenAI-compatible Whisper API)
//!
//! Both sides authenticate through the same [`ApiKeySource`].

mod api_key;
pub mod llm;
pub mod speech;

pub use api_key::ApiKeySource;
pub use llm::{
    CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message, MessageRole,
    OpenAIProvider, OPENAI_API_BASE,
};
pub use speech::{SpeechToText, TranscriptionError, WhisperTranscriber};
