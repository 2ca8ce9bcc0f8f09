//! Speech-to-text capability.

mod whisper;

use crate::ai::api_key::ApiKeyError;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use whisper::WhisperTranscriber;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Could not read audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ApiKeyError> for TranscriptionError {
    fn from(err: ApiKeyError) -> Self {
        match err {
            ApiKeyError::Timeout => TranscriptionError::Timeout,
            ApiKeyError::CommandFailed(msg) => TranscriptionError::Connection(msg),
        }
    }
}

/// Turns a recorded audio file into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    fn model(&self) -> &str;

    /// Transcribe the audio stored at `audio_path`. The file must stay on
    /// disk until the returned future resolves.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}
