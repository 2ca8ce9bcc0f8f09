use super::{SpeechToText, TranscriptionError};
use crate::ai::api_key::ApiKeySource;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: Client,
    base_url: String,
    model: String,
    api_key_source: ApiKeySource,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperTranscriber {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_source: ApiKeySource,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key_source,
            timeout: DEFAULT_TRANSCRIPTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

fn file_name_of(audio_path: &Path) -> String {
    audio_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.webm".to_string())
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    fn model(&self) -> &str {
        &self.model
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(audio_path).await?;
        debug!(
            path = %audio_path.display(),
            size = bytes.len(),
            model = %self.model,
            "Sending audio for transcription"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name_of(audio_path))
            .mime_str("audio/webm")
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let mut req_builder = self.client.post(self.endpoint()).multipart(form);
        if let Some(api_key) = self.api_key_source.get_key().await? {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else {
                    TranscriptionError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        debug!(
            chars = parsed.text.chars().count(),
            "Transcription received"
        );
        Ok(parsed.text)
    }
}
