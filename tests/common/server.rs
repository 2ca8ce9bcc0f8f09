//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own stubs and audio temp dir.

use super::constants::*;
use super::stubs::{StubLlm, StubSpeech};
use mate_server::ai::{LlmProvider, SpeechToText};
use mate_server::audio::{AnalyzerSettings, AudioAnalyzer, AudioIngestor};
use mate_server::providers::{MusicProvider, Platform};
use mate_server::search::SearchAggregator;
use mate_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated stubs
///
/// When dropped, the server gracefully shuts down and the audio temp dir is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    temp_audio_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Collects the collaborators a test server is wired with.
///
/// Anything left unset gets a harmless stub: no providers, an empty
/// transcript and an empty JSON completion.
pub struct TestServerBuilder {
    providers: Vec<Arc<dyn MusicProvider>>,
    default_platform: Platform,
    provider_timeout: Duration,
    speech: Arc<dyn SpeechToText>,
    llm: Arc<dyn LlmProvider>,
}

impl TestServerBuilder {
    pub fn provider(mut self, provider: impl MusicProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn default_platform(mut self, platform: Platform) -> Self {
        self.default_platform = platform;
        self
    }

    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn speech(mut self, speech: impl SpeechToText + 'static) -> Self {
        self.speech = Arc::new(speech);
        self
    }

    pub fn llm(mut self, llm: impl LlmProvider + 'static) -> Self {
        self.llm = Arc::new(llm);
        self
    }

    /// Spawns the server on a random port and waits until it answers.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir cannot be created, the port cannot be bound,
    /// or the server does not become ready within the timeout.
    pub async fn spawn(self) -> TestServer {
        let temp_audio_dir = TempDir::new().expect("Failed to create audio temp dir");

        let aggregator = SearchAggregator::new(
            self.providers,
            self.default_platform,
            20,
            self.provider_timeout,
        );
        let audio = AudioAnalyzer::new(
            AudioIngestor::new(
                Some(temp_audio_dir.path().to_path_buf()),
                TEST_MAX_AUDIO_BYTES,
            ),
            self.speech,
            self.llm,
            AnalyzerSettings::default(),
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app = make_app(ServerState::new(
            config,
            "test-hash",
            Arc::new(aggregator),
            Arc::new(audio),
        ));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = TestServer {
            base_url,
            port,
            temp_audio_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder {
            providers: Vec::new(),
            default_platform: Platform::Jamendo,
            provider_timeout: Duration::from_millis(PROVIDER_TIMEOUT_MS),
            speech: Arc::new(StubSpeech::transcript("")),
            llm: Arc::new(StubLlm::replying("{}")),
        }
    }

    /// Directory the server writes transient audio files into.
    pub fn audio_dir(&self) -> &Path {
        self.temp_audio_dir.path()
    }

    /// Number of files currently left in [`Self::audio_dir`].
    pub fn audio_files_left(&self) -> usize {
        std::fs::read_dir(self.audio_dir())
            .expect("Failed to list audio temp dir")
            .count()
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
