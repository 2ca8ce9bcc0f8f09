//! Multi-provider search fan-out.

use crate::providers::{MusicProvider, Platform, ProviderError, SearchResult};
use crate::server::metrics;
use chrono::DateTime;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Ordering/filter policy applied after all providers answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Keep the providers' native order.
    #[default]
    Relevance,
    Newest,
    Popularity,
    /// Keep only Creative Commons / public domain items, order untouched.
    PublicDomain,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::Relevance,
        SortBy::Newest,
        SortBy::Popularity,
        SortBy::PublicDomain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Newest => "newest",
            SortBy::Popularity => "popularity",
            SortBy::PublicDomain => "publicDomain",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort mode '{}'", s))
    }
}

/// Which providers a search fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub fn includes(&self, platform: Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(p) => *p == platform,
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(PlatformFilter::All);
        }
        s.parse::<Platform>().map(PlatformFilter::Only)
    }
}

/// Fans a query out to the registered providers and merges their answers.
///
/// Providers are queried concurrently; a provider that errors or times out
/// contributes nothing and never fails the aggregation.
pub struct SearchAggregator {
    providers: Vec<Arc<dyn MusicProvider>>,
    default_platform: Platform,
    max_results: usize,
    provider_timeout: Duration,
}

impl SearchAggregator {
    /// # Arguments
    /// * `providers` - Registered adapters; their order is the concatenation order.
    /// * `default_platform` - Provider asked for the trending set on empty queries.
    /// * `max_results` - Per-provider result limit.
    /// * `provider_timeout` - Budget for a single provider call.
    pub fn new(
        providers: Vec<Arc<dyn MusicProvider>>,
        default_platform: Platform,
        max_results: usize,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            default_platform,
            max_results,
            provider_timeout,
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.providers.iter().map(|p| p.platform()).collect()
    }

    /// Run a search. An empty (or whitespace-only) query returns the default
    /// provider's trending listing instead.
    pub async fn aggregate(
        &self,
        query: &str,
        sort_by: SortBy,
        platform_filter: PlatformFilter,
    ) -> Vec<SearchResult> {
        let query = query.trim();
        let start = Instant::now();

        let results = if query.is_empty() {
            self.trending().await
        } else {
            self.fan_out(query, platform_filter).await
        };

        let results = apply_sort_policy(results, sort_by);

        info!(
            query = %query,
            sort_by = %sort_by,
            count = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search aggregated"
        );
        results
    }

    async fn trending(&self) -> Vec<SearchResult> {
        let provider = match self
            .providers
            .iter()
            .find(|p| p.platform() == self.default_platform)
        {
            Some(provider) => provider,
            None => {
                warn!(
                    platform = %self.default_platform,
                    "Default provider is not registered, no trending results"
                );
                return Vec::new();
            }
        };

        self.call_isolated(provider.as_ref(), provider.trending(self.max_results))
            .await
    }

    async fn fan_out(&self, query: &str, platform_filter: PlatformFilter) -> Vec<SearchResult> {
        let calls: Vec<_> = self
            .providers
            .iter()
            .filter(|provider| platform_filter.includes(provider.platform()))
            .map(|provider| {
                self.call_isolated(provider.as_ref(), provider.search(query, self.max_results))
            })
            .collect();

        debug!(query = %query, providers = calls.len(), "Fanning out search");

        // join_all keeps the input order, so the concatenation follows the
        // registration order regardless of which provider answers first.
        join_all(calls).await.into_iter().flatten().collect()
    }

    async fn call_isolated<F>(&self, provider: &dyn MusicProvider, call: F) -> Vec<SearchResult>
    where
        F: std::future::Future<Output = Result<Vec<SearchResult>, ProviderError>>,
    {
        let platform = provider.platform();
        let start = Instant::now();

        let outcome = match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };
        let elapsed = start.elapsed();

        match outcome {
            Ok(mut results) => {
                // Adapters own the platform tag, but a mislabelled item would
                // break the (platform, id) identity, so stamp it here too.
                for result in results.iter_mut() {
                    result.platform = platform;
                }
                metrics::record_provider_request(platform.as_str(), "success", elapsed);
                debug!(
                    platform = %platform,
                    count = results.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Provider answered"
                );
                results
            }
            Err(err) => {
                metrics::record_provider_request(platform.as_str(), "failure", elapsed);
                warn!(platform = %platform, error = %err, "Provider search failed");
                Vec::new()
            }
        }
    }
}

/// Parses `publishedAt` for ordering. Unparsable values sort as the epoch.
fn published_timestamp_millis(result: &SearchResult) -> i64 {
    DateTime::parse_from_rfc3339(&result.published_at)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

fn is_openly_licensed(result: &SearchResult) -> bool {
    match &result.description {
        Some(description) => {
            let description = description.to_lowercase();
            description.contains("creative commons") || description.contains("public domain")
        }
        None => false,
    }
}

/// Applies the ordering/filter policy. All sorts are stable.
pub fn apply_sort_policy(mut results: Vec<SearchResult>, sort_by: SortBy) -> Vec<SearchResult> {
    match sort_by {
        SortBy::Relevance => results,
        SortBy::Newest => {
            results
                .sort_by(|a, b| published_timestamp_millis(b).cmp(&published_timestamp_millis(a)));
            results
        }
        SortBy::Popularity => {
            results.sort_by(|a, b| b.view_count.unwrap_or(0).cmp(&a.view_count.unwrap_or(0)));
            results
        }
        SortBy::PublicDomain => results.into_iter().filter(is_openly_licensed).collect(),
    }
}
