//! YouTube Data API v3 adapter.
//!
//! Search is a two-step lookup: `search.list` returns matching video IDs,
//! then `videos.list` fetches snippet, duration and statistics for exactly
//! those IDs.

use super::duration::normalize_duration;
use super::{clamp_max_results, now_timestamp, MusicProvider, Platform, ProviderError, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube category ID for "Music".
const MUSIC_CATEGORY_ID: &str = "10";

pub struct YouTubeProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct VideosListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    id: Option<String>,
    snippet: Option<VideoSnippet>,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatistics>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: Option<String>,
    channel_title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
}

impl YouTubeProvider {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the Data API (usually [`YOUTUBE_API_BASE`]).
    /// * `api_key` - API key sent as the `key` query parameter.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn search_video_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: SearchListResponse = check_status(response).await?.json().await?;

        Ok(body
            .items
            .into_iter()
            .filter_map(|item| item.id.and_then(|id| id.video_id))
            .filter(|id| !id.is_empty())
            .collect())
    }

    async fn fetch_videos(&self, ids: &[String]) -> Result<Vec<Video>, ProviderError> {
        let url = format!("{}/videos", self.base_url);
        let joined_ids = ids.join(",");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", joined_ids.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: VideosListResponse = check_status(response).await?.json().await?;
        Ok(body.items)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

fn map_video(video: Video) -> Option<SearchResult> {
    let id = video.id.filter(|id| !id.is_empty())?;
    let snippet = video.snippet;

    let duration = video
        .content_details
        .and_then(|details| details.duration)
        .unwrap_or_else(|| "PT0S".to_string());

    let (title, artist, description, published_at, thumbnail) = match snippet {
        Some(snippet) => {
            let thumbnail = snippet
                .thumbnails
                .and_then(|t| {
                    t.high
                        .and_then(|thumb| thumb.url)
                        .or_else(|| t.default.and_then(|thumb| thumb.url))
                })
                .unwrap_or_default();
            (
                snippet.title,
                snippet.channel_title,
                snippet.description,
                snippet.published_at,
                thumbnail,
            )
        }
        None => (None, None, None, None, String::new()),
    };

    let view_count = video
        .statistics
        .and_then(|s| s.view_count)
        .and_then(|count| count.parse::<u64>().ok())
        .unwrap_or(0);

    Some(SearchResult {
        title: title.unwrap_or_else(|| "Unknown".to_string()),
        artist: artist.unwrap_or_else(|| "Unknown Artist".to_string()),
        thumbnail,
        duration: normalize_duration(&duration),
        platform: Platform::YouTube,
        url: format!("https://www.youtube.com/watch?v={}", id),
        embed_url: Some(format!("https://www.youtube.com/embed/{}", id)),
        published_at: published_at.unwrap_or_else(now_timestamp),
        view_count: Some(view_count),
        description: Some(description.unwrap_or_default()),
        id,
    })
}

#[async_trait]
impl MusicProvider for YouTubeProvider {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let ids = self
            .search_video_ids(query, clamp_max_results(max_results))
            .await?;

        if ids.is_empty() {
            debug!(query = %query, "YouTube search returned no videos");
            return Ok(Vec::new());
        }

        let videos = self.fetch_videos(&ids).await?;
        Ok(videos.into_iter().filter_map(map_video).collect())
    }
}
