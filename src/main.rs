use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mate_server::ai::{OpenAIProvider, WhisperTranscriber};
use mate_server::audio::{AnalyzerSettings, AudioAnalyzer, AudioIngestor};
use mate_server::config::{AppConfig, CliConfig, FileConfig};
use mate_server::providers::{
    JamendoProvider, MusicProvider, Platform, UnavailableProvider, YouTubeProvider,
};
use mate_server::search::SearchAggregator;
use mate_server::server::{run_server, RequestsLoggingLevel, ServerState};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Optional TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory for transient audio files. Defaults to the OS temp dir.
    #[clap(long, value_parser = parse_path)]
    pub temp_dir: Option<PathBuf>,

    /// YouTube Data API key. Without it YouTube returns no results.
    #[clap(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Jamendo application client ID. Without it Jamendo returns no results.
    #[clap(long, env = "JAMENDO_CLIENT_ID", hide_env_values = true)]
    pub jamendo_client_id: Option<String>,

    /// API key for the OpenAI-compatible transcription and completion endpoints.
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            temp_dir: args.temp_dir.clone(),
            youtube_api_key: args.youtube_api_key.clone(),
            jamendo_client_id: args.jamendo_client_id.clone(),
            openai_api_key: args.openai_api_key.clone(),
        }
    }
}

fn build_providers(config: &AppConfig) -> Result<Vec<Arc<dyn MusicProvider>>> {
    let timeout = config.search.provider_timeout;
    let mut providers: Vec<Arc<dyn MusicProvider>> = Vec::new();

    match &config.youtube.api_key {
        Some(key) => providers.push(Arc::new(
            YouTubeProvider::new(&config.youtube.base_url, key, timeout)
                .context("Failed to create YouTube provider")?,
        )),
        None => {
            warn!("No YouTube API key configured, YouTube search disabled");
            providers.push(Arc::new(UnavailableProvider::new(
                Platform::YouTube,
                "no API key configured",
            )));
        }
    }

    providers.push(Arc::new(UnavailableProvider::new(
        Platform::SoundCloud,
        "no public API available",
    )));

    match &config.jamendo.client_id {
        Some(client_id) => providers.push(Arc::new(
            JamendoProvider::new(&config.jamendo.base_url, client_id, timeout)
                .context("Failed to create Jamendo provider")?,
        )),
        None => {
            warn!("No Jamendo client ID configured, Jamendo search disabled");
            providers.push(Arc::new(UnavailableProvider::new(
                Platform::Jamendo,
                "no client ID configured",
            )));
        }
    }

    Ok(providers)
}

fn build_audio_analyzer(config: &AppConfig) -> AudioAnalyzer {
    let openai = &config.openai;
    if !openai.api_key.is_configured() {
        warn!("No OpenAI API key configured, audio analysis will degrade to empty results");
    }

    let speech = WhisperTranscriber::new(
        &openai.base_url,
        &openai.transcription_model,
        openai.api_key.clone(),
    )
    .with_timeout(openai.timeout);
    let llm = OpenAIProvider::new(
        &openai.base_url,
        &openai.completion_model,
        openai.api_key.clone(),
    );

    AudioAnalyzer::new(
        AudioIngestor::new(config.temp_dir.clone(), config.audio.max_audio_bytes),
        Arc::new(speech),
        Arc::new(llm),
        AnalyzerSettings {
            min_transcript_chars: config.audio.min_transcript_chars,
            completion_timeout: openai.timeout,
        },
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    let aggregator = SearchAggregator::new(
        build_providers(&config)?,
        config.search.default_provider,
        config.search.max_results_per_provider,
        config.search.provider_timeout,
    );
    info!(
        "Registered providers: {:?} (trending from {})",
        aggregator.platforms(),
        config.search.default_provider
    );

    let audio = build_audio_analyzer(&config);
    info!(
        "Audio analysis via {} (completion {}, transcription {})",
        config.openai.base_url, config.openai.completion_model, config.openai.transcription_model
    );

    let state = ServerState::new(
        config.server_config(),
        env!("GIT_HASH"),
        Arc::new(aggregator),
        Arc::new(audio),
    );

    info!("Ready to serve at port {}!", config.port);
    run_server(state).await?;

    info!("Server stopped");
    Ok(())
}
