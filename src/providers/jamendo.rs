//! Jamendo API v3 adapter.
//!
//! Jamendo hosts Creative Commons music, so it doubles as the default
//! provider for the trending listing shown when no query is given.

use super::duration::format_seconds;
use super::{clamp_max_results, now_timestamp, MusicProvider, Platform, ProviderError, SearchResult};
use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const JAMENDO_API_BASE: &str = "https://api.jamendo.com/v3.0";

pub struct JamendoProvider {
    client: Client,
    base_url: String,
    client_id: String,
}

#[derive(Deserialize)]
struct TracksResponse {
    headers: Option<ResponseHeaders>,
    #[serde(default)]
    results: Vec<JamendoTrack>,
}

#[derive(Deserialize)]
struct ResponseHeaders {
    status: Option<String>,
    code: Option<i64>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct JamendoTrack {
    id: Option<Value>,
    name: Option<String>,
    artist_name: Option<String>,
    duration: Option<Value>,
    album_image: Option<String>,
    image: Option<String>,
    audio: Option<String>,
    shareurl: Option<String>,
    releasedate: Option<String>,
    license_ccurl: Option<String>,
    stats: Option<TrackStats>,
}

#[derive(Deserialize)]
struct TrackStats {
    rate_listened_total: Option<Value>,
}

/// Jamendo is inconsistent about numbers vs numeric strings.
fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn release_date_to_timestamp(date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(midnight.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn map_track(track: JamendoTrack) -> Option<SearchResult> {
    let id = track.id.as_ref().and_then(value_as_string)?;

    let thumbnail = non_empty(track.album_image)
        .or_else(|| non_empty(track.image))
        .unwrap_or_default();
    let audio = non_empty(track.audio);
    let url = non_empty(track.shareurl)
        .or_else(|| audio.clone())
        .unwrap_or_else(|| format!("https://www.jamendo.com/track/{}", id));
    let duration = track.duration.as_ref().and_then(value_as_u64).unwrap_or(0);
    let published_at = track
        .releasedate
        .as_deref()
        .and_then(release_date_to_timestamp)
        .unwrap_or_else(now_timestamp);
    let view_count = track
        .stats
        .and_then(|s| s.rate_listened_total)
        .as_ref()
        .and_then(value_as_u64)
        .unwrap_or(0);
    let description = non_empty(track.license_ccurl)
        .map(|license| format!("Creative Commons license: {}", license))
        .unwrap_or_default();

    Some(SearchResult {
        title: non_empty(track.name).unwrap_or_else(|| "Unknown".to_string()),
        artist: non_empty(track.artist_name).unwrap_or_else(|| "Unknown Artist".to_string()),
        thumbnail,
        duration: format_seconds(duration),
        platform: Platform::Jamendo,
        url,
        embed_url: audio,
        published_at,
        view_count: Some(view_count),
        description: Some(description),
        id,
    })
}

impl JamendoProvider {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (usually [`JAMENDO_API_BASE`]).
    /// * `client_id` - Jamendo application client ID.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
        })
    }

    async fn fetch_tracks(
        &self,
        extra_params: &[(&str, &str)],
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let url = format!("{}/tracks/", self.base_url);
        let limit = clamp_max_results(max_results).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("include", "musicinfo stats licenses"),
                ("audioformat", "mp32"),
            ])
            .query(extra_params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TracksResponse = response.json().await?;

        if let Some(headers) = &body.headers {
            if headers.status.as_deref() == Some("failed") {
                return Err(ProviderError::Api {
                    status: headers.code.unwrap_or(0).clamp(0, u16::MAX as i64) as u16,
                    message: headers.error_message.clone().unwrap_or_default(),
                });
            }
        }

        Ok(body.results.into_iter().filter_map(map_track).collect())
    }
}

#[async_trait]
impl MusicProvider for JamendoProvider {
    fn platform(&self) -> Platform {
        Platform::Jamendo
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let results = self.fetch_tracks(&[("search", query)], max_results).await?;
        debug!(query = %query, count = results.len(), "Jamendo search completed");
        Ok(results)
    }

    async fn trending(&self, max_results: usize) -> Result<Vec<SearchResult>, ProviderError> {
        self.fetch_tracks(&[("order", "popularity_week")], max_results)
            .await
    }
}
