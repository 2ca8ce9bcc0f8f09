//! Audio pipelines: vibe matching and lyric-based song recognition.
//!
//! Both pipelines share the same front half. The base64 payload is written
//! to a [`TransientAudio`] file, the file is transcribed, and the file is
//! released before any completion call is made. The back halves differ in
//! how they treat upstream failures:
//!
//! - vibe matching is best effort: a failed transcription becomes an empty
//!   transcript and a failed classification becomes an empty result.
//! - recognition needs lyrics: a failed transcription, a transcript below the
//!   gate, or a failed identification all end as `NotRecognized`.
//!
//! Only malformed payloads and local I/O failures are errors.

mod ingestion;
mod recognition;
mod vibe;
mod vocabulary;

pub use ingestion::{decode_audio_payload, AudioIngestor, AudioPurpose, TransientAudio};
pub use recognition::{
    build_identification_prompt, parse_recognition_response, passes_transcript_gate,
    AudioRecognitionResult, RecognizedSong,
};
pub use vibe::{
    build_vibe_prompt, parse_vibe_response, ClassificationError, Vibe, VibeMatchResult,
    NO_TRANSCRIPT_MARKER,
};
pub use vocabulary::{canonical_vibe, VIBE_VOCABULARY, VIBE_VOCABULARY_VERSION};

use crate::ai::{CompletionOptions, LlmProvider, SpeechToText, TranscriptionError};
use crate::server::metrics;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MIN_TRANSCRIPT_CHARS: usize = 10;
pub const DEFAULT_MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
const VIBE_MAX_COMPLETION_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio payload is not valid base64: {0}")]
    InvalidPayload(String),

    #[error("audio payload is empty")]
    EmptyPayload,

    #[error("audio payload is {size} bytes, the limit is {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("failed to store audio: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Whether the caller sent something unusable, as opposed to a local failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AudioError::Io(_))
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub min_transcript_chars: usize,
    pub completion_timeout: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            min_transcript_chars: DEFAULT_MIN_TRANSCRIPT_CHARS,
            completion_timeout: Duration::from_secs(120),
        }
    }
}

pub struct AudioAnalyzer {
    ingestor: AudioIngestor,
    speech: Arc<dyn SpeechToText>,
    llm: Arc<dyn LlmProvider>,
    settings: AnalyzerSettings,
}

impl AudioAnalyzer {
    pub fn new(
        ingestor: AudioIngestor,
        speech: Arc<dyn SpeechToText>,
        llm: Arc<dyn LlmProvider>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            ingestor,
            speech,
            llm,
            settings,
        }
    }

    pub async fn vibe_match(&self, audio_base64: &str) -> Result<VibeMatchResult, AudioError> {
        let audio = self
            .ingestor
            .ingest(audio_base64, AudioPurpose::VibeMatch)
            .await?;
        let transcript = match self.transcribe(&audio).await {
            Ok(text) => text,
            Err(e) => {
                info!(error = %e, "Transcription failed, classifying without transcript");
                String::new()
            }
        };
        audio.release();

        let options = CompletionOptions {
            max_tokens: Some(VIBE_MAX_COMPLETION_TOKENS),
            timeout: self.settings.completion_timeout,
            ..Default::default()
        };
        match vibe::classify(self.llm.as_ref(), &transcript, &options).await {
            Ok(result) => {
                metrics::record_ai_request("completion", "success");
                debug!(
                    vibes = result.vibes.len(),
                    terms = result.suggested_search_terms.len(),
                    "Vibe classification done"
                );
                Ok(result)
            }
            Err(e) => {
                metrics::record_ai_request("completion", "failure");
                warn!(error = %e, "Vibe classification failed, returning empty result");
                Ok(VibeMatchResult::default())
            }
        }
    }

    pub async fn recognize(
        &self,
        audio_base64: &str,
    ) -> Result<AudioRecognitionResult, AudioError> {
        let audio = self
            .ingestor
            .ingest(audio_base64, AudioPurpose::Recognition)
            .await?;
        let transcription = self.transcribe(&audio).await;
        audio.release();

        let transcript = match transcription {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Transcription failed, cannot recognize");
                return Ok(AudioRecognitionResult::NotRecognized);
            }
        };

        if !passes_transcript_gate(&transcript, self.settings.min_transcript_chars) {
            debug!(
                chars = transcript.trim().chars().count(),
                min = self.settings.min_transcript_chars,
                "Transcript too short to identify"
            );
            return Ok(AudioRecognitionResult::NotRecognized);
        }

        let options = CompletionOptions {
            timeout: self.settings.completion_timeout,
            ..Default::default()
        };
        match recognition::identify(self.llm.as_ref(), &transcript, &options).await {
            Ok(result) => {
                metrics::record_ai_request("completion", "success");
                info!(recognized = result.is_recognized(), "Identification done");
                Ok(result)
            }
            Err(e) => {
                metrics::record_ai_request("completion", "failure");
                warn!(error = %e, "Identification failed");
                Ok(AudioRecognitionResult::NotRecognized)
            }
        }
    }

    async fn transcribe(&self, audio: &TransientAudio) -> Result<String, TranscriptionError> {
        let result = self.speech.transcribe(audio.path()).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::record_ai_request("transcription", outcome);
        result
    }
}
