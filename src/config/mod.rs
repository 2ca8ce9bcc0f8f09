mod file_config;

pub use file_config::{
    AudioConfig, FileConfig, JamendoConfig, OpenAiConfig, SearchConfig, YouTubeConfig,
};

use crate::ai::{ApiKeySource, OPENAI_API_BASE};
use crate::audio::{DEFAULT_MAX_AUDIO_BYTES, DEFAULT_MIN_TRANSCRIPT_CHARS};
use crate::providers::{Platform, JAMENDO_API_BASE, MAX_PROVIDER_RESULTS, YOUTUBE_API_BASE};
use crate::server::config::{DEFAULT_MAX_REQUEST_BODY_BYTES, DEFAULT_METRICS_PORT, DEFAULT_PORT};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-5";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Room left in a request body for the JSON envelope around the base64 audio.
const REQUEST_ENVELOPE_BYTES: usize = 64 * 1024;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub temp_dir: Option<PathBuf>,
    pub youtube_api_key: Option<String>,
    pub jamendo_client_id: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            logging_level: RequestsLoggingLevel::default(),
            temp_dir: None,
            youtube_api_key: None,
            jamendo_client_id: None,
            openai_api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub temp_dir: Option<PathBuf>,
    pub max_request_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,

    pub search: SearchSettings,
    pub youtube: YouTubeSettings,
    pub jamendo: JamendoSettings,
    pub openai: OpenAiSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub default_provider: Platform,
    pub max_results_per_provider: usize,
    pub provider_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    /// `None` leaves YouTube registered as an unavailable source.
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct JamendoSettings {
    pub client_id: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: ApiKeySource,
    pub base_url: String,
    pub completion_model: String,
    pub transcription_model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub max_audio_bytes: usize,
    pub min_transcript_chars: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port && port != 0 {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = match file.logging_level {
            Some(level) => parse_logging_level(&level)
                .ok_or_else(|| anyhow!("Invalid logging_level: {}", level))?,
            None => cli.logging_level.clone(),
        };

        let temp_dir = file
            .temp_dir
            .map(PathBuf::from)
            .or_else(|| cli.temp_dir.clone());
        if let Some(dir) = &temp_dir {
            if !dir.exists() {
                bail!("Temp directory does not exist: {:?}", dir);
            }
            if !dir.is_dir() {
                bail!("temp_dir is not a directory: {:?}", dir);
            }
        }

        let max_request_body_bytes = file
            .max_request_body_bytes
            .unwrap_or(DEFAULT_MAX_REQUEST_BODY_BYTES);
        let cors_allowed_origins = file.cors_allowed_origins.unwrap_or_default();

        let search_file = file.search.unwrap_or_default();
        let default_provider = match search_file.default_provider {
            Some(name) => name
                .parse::<Platform>()
                .map_err(|e| anyhow!("Invalid search.default_provider: {}", e))?,
            None => Platform::Jamendo,
        };
        let search = SearchSettings {
            default_provider,
            max_results_per_provider: search_file
                .max_results_per_provider
                .unwrap_or(MAX_PROVIDER_RESULTS)
                .clamp(1, MAX_PROVIDER_RESULTS),
            provider_timeout: Duration::from_secs(
                search_file
                    .provider_timeout_secs
                    .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            ),
        };

        let youtube_file = file.youtube.unwrap_or_default();
        let youtube = YouTubeSettings {
            api_key: non_blank(youtube_file.api_key)
                .or_else(|| non_blank(cli.youtube_api_key.clone())),
            base_url: youtube_file
                .base_url
                .unwrap_or_else(|| YOUTUBE_API_BASE.to_string()),
        };

        let jamendo_file = file.jamendo.unwrap_or_default();
        let jamendo = JamendoSettings {
            client_id: non_blank(jamendo_file.client_id)
                .or_else(|| non_blank(cli.jamendo_client_id.clone())),
            base_url: jamendo_file
                .base_url
                .unwrap_or_else(|| JAMENDO_API_BASE.to_string()),
        };

        let openai_file = file.openai.unwrap_or_default();
        let api_key = match (
            non_blank(openai_file.api_key),
            non_blank(openai_file.api_key_command),
        ) {
            (Some(_), Some(_)) => {
                bail!("openai.api_key and openai.api_key_command are mutually exclusive")
            }
            (None, Some(command)) => ApiKeySource::Command(command),
            (key, None) => {
                ApiKeySource::from_config(key.or_else(|| cli.openai_api_key.clone()), None)
            }
        };
        let openai = OpenAiSettings {
            api_key,
            base_url: openai_file
                .base_url
                .unwrap_or_else(|| OPENAI_API_BASE.to_string()),
            completion_model: openai_file
                .completion_model
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            transcription_model: openai_file
                .transcription_model
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            timeout: Duration::from_secs(
                openai_file
                    .timeout_secs
                    .unwrap_or(DEFAULT_OPENAI_TIMEOUT_SECS),
            ),
        };

        let audio_file = file.audio.unwrap_or_default();
        let audio = AudioSettings {
            max_audio_bytes: audio_file
                .max_audio_bytes
                .unwrap_or(DEFAULT_MAX_AUDIO_BYTES),
            min_transcript_chars: audio_file
                .min_transcript_chars
                .unwrap_or(DEFAULT_MIN_TRANSCRIPT_CHARS),
        };
        if audio.max_audio_bytes == 0 {
            bail!("audio.max_audio_bytes must be greater than zero");
        }
        let encoded_audio_bytes = audio.max_audio_bytes.div_ceil(3) * 4;
        if max_request_body_bytes < encoded_audio_bytes + REQUEST_ENVELOPE_BYTES {
            bail!(
                "max_request_body_bytes ({}) is too small for base64 audio of {} bytes (need {})",
                max_request_body_bytes,
                audio.max_audio_bytes,
                encoded_audio_bytes + REQUEST_ENVELOPE_BYTES
            );
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            temp_dir,
            max_request_body_bytes,
            cors_allowed_origins,
            search,
            youtube,
            jamendo,
            openai,
            audio,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            max_request_body_bytes: self.max_request_body_bytes,
            cors_allowed_origins: self.cors_allowed_origins.clone(),
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
