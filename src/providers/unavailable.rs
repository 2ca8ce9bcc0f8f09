use super::{MusicProvider, Platform, ProviderError, SearchResult};
use async_trait::async_trait;
use tracing::debug;

/// Stand-in for a platform with no usable backend (no public API, or no
/// credentials configured). Always answers with an empty list.
pub struct UnavailableProvider {
    platform: Platform,
    reason: String,
}

impl UnavailableProvider {
    pub fn new(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl MusicProvider for UnavailableProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn search(
        &self,
        query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        debug!(
            platform = %self.platform,
            query = %query,
            reason = %self.reason,
            "Search skipped, provider unavailable"
        );
        Ok(Vec::new())
    }
}
