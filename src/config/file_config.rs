use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub temp_dir: Option<String>,
    pub max_request_body_bytes: Option<usize>,
    pub cors_allowed_origins: Option<Vec<String>>,

    // Sections
    pub search: Option<SearchConfig>,
    pub youtube: Option<YouTubeConfig>,
    pub jamendo: Option<JamendoConfig>,
    pub openai: Option<OpenAiConfig>,
    pub audio: Option<AudioConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider used for the trending listing: "youtube", "soundcloud", "jamendo"
    pub default_provider: Option<String>,
    pub max_results_per_provider: Option<usize>,
    pub provider_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct JamendoConfig {
    pub client_id: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    /// Shell command printing the key; mutually exclusive with `api_key`.
    pub api_key_command: Option<String>,
    pub base_url: Option<String>,
    pub completion_model: Option<String>,
    pub transcription_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AudioConfig {
    pub max_audio_bytes: Option<usize>,
    pub min_transcript_chars: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
