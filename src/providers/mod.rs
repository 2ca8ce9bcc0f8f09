//! Music provider adapters.
//!
//! Each external music source is wrapped in a [`MusicProvider`] that turns a
//! free-text query into the source's native calls and maps the response into
//! the canonical [`SearchResult`] shape:
//! - YouTube: two-step search (search by text, then fetch video details)
//! - Jamendo: single-call search plus a weekly trending listing
//! - Unavailable: stub for sources without credentials (SoundCloud)

pub mod duration;
mod jamendo;
mod unavailable;
mod youtube;

pub use jamendo::{JamendoProvider, JAMENDO_API_BASE};
pub use unavailable::UnavailableProvider;
pub use youtube::{YouTubeProvider, YOUTUBE_API_BASE};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the number of items a single provider call may return.
pub const MAX_PROVIDER_RESULTS: usize = 20;

/// The external source a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    SoundCloud,
    Jamendo,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::SoundCloud, Platform::Jamendo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::SoundCloud => "soundcloud",
            Platform::Jamendo => "jamendo",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Canonical search result shared by every provider.
///
/// `id` is only unique within its platform; the identity of a result across
/// platforms is the `(platform, id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail: String,
    pub duration: String,
    pub platform: Platform,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Errors surfaced by a provider adapter. Never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// A searchable external music source.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// The platform tag stamped on every result from this provider.
    fn platform(&self) -> Platform;

    /// Search the provider for `query`, returning at most `max_results` items
    /// (clamped to [`MAX_PROVIDER_RESULTS`]) in the provider's native order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError>;

    /// Default listing shown when no query is given.
    async fn trending(&self, _max_results: usize) -> Result<Vec<SearchResult>, ProviderError> {
        Ok(Vec::new())
    }
}

pub(crate) fn clamp_max_results(max_results: usize) -> usize {
    max_results.clamp(1, MAX_PROVIDER_RESULTS)
}

/// Current wall-clock time in the same shape providers use for `publishedAt`.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
