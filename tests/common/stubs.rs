//! In-process stand-ins for the external services
//!
//! Every stub counts its calls through a shared counter so tests can assert
//! that an upstream was (or was not) reached after the stub has been handed
//! to the server.

use async_trait::async_trait;
use mate_server::ai::{
    CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message, SpeechToText,
    TranscriptionError,
};
use mate_server::providers::{MusicProvider, Platform, ProviderError, SearchResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builds a result with neutral defaults; tests override what they assert on.
pub fn result(platform: Platform, id: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        thumbnail: String::new(),
        duration: "3:00".to_string(),
        platform,
        url: format!("https://{}.example/{}", platform, id),
        embed_url: None,
        published_at: "2024-01-01T00:00:00.000Z".to_string(),
        view_count: Some(0),
        description: Some(String::new()),
    }
}

// ============================================================================
// Music providers
// ============================================================================

pub struct StubProvider {
    platform: Platform,
    items: Vec<SearchResult>,
    trending: Vec<SearchResult>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    pub fn new(platform: Platform, items: Vec<SearchResult>) -> Self {
        Self {
            platform,
            items,
            trending: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_trending(mut self, trending: Vec<SearchResult>) -> Self {
        self.trending = trending;
        self
    }

    /// Counter of `search` and `trending` calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl MusicProvider for StubProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.iter().take(max_results).cloned().collect())
    }

    async fn trending(&self, max_results: usize) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.trending.iter().take(max_results).cloned().collect())
    }
}

/// Answers every call with an upstream 500.
pub struct FailingProvider {
    platform: Platform,
}

impl FailingProvider {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl MusicProvider for FailingProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "upstream exploded".to_string(),
        })
    }
}

/// Sleeps past any sensible provider timeout before answering.
pub struct SlowProvider {
    platform: Platform,
    delay: Duration,
}

impl SlowProvider {
    pub fn new(platform: Platform, delay: Duration) -> Self {
        Self { platform, delay }
    }
}

#[async_trait]
impl MusicProvider for SlowProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn search(
        &self,
        query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![result(self.platform, query)])
    }
}

// ============================================================================
// Speech to text
// ============================================================================

pub struct StubSpeech {
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(PathBuf, Option<u64>)>>>,
}

impl StubSpeech {
    pub fn transcript(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_reply(Err("speech service unavailable".to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Paths handed to `transcribe`, with the file size at that moment
    /// (`None` when the file did not exist).
    pub fn seen_files(&self) -> Arc<Mutex<Vec<(PathBuf, Option<u64>)>>> {
        self.seen.clone()
    }
}

#[async_trait]
impl SpeechToText for StubSpeech {
    fn model(&self) -> &str {
        "stub-whisper"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let size = std::fs::metadata(audio_path).ok().map(|meta| meta.len());
        self.seen
            .lock()
            .unwrap()
            .push((audio_path.to_path_buf(), size));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(TranscriptionError::Api {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

// ============================================================================
// Completion
// ============================================================================

pub struct StubLlm {
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubLlm {
    pub fn replying(content: &str) -> Self {
        Self::with_reply(Ok(content.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_reply(Err("model overloaded".to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// The user message of every completion request received.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        match &self.reply {
            Ok(content) => Ok(CompletionResponse::from_text(content)),
            Err(message) => Err(LlmError::Api {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}
