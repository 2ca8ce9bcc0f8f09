use axum::extract::FromRef;

use crate::audio::AudioAnalyzer;
use crate::search::SearchAggregator;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSearchAggregator = Arc<SearchAggregator>;
pub type GuardedAudioAnalyzer = Arc<AudioAnalyzer>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub aggregator: GuardedSearchAggregator,
    pub audio: GuardedAudioAnalyzer,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        hash: impl Into<String>,
        aggregator: GuardedSearchAggregator,
        audio: GuardedAudioAnalyzer,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            hash: hash.into(),
            aggregator,
            audio,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedSearchAggregator {
    fn from_ref(input: &ServerState) -> Self {
        input.aggregator.clone()
    }
}

impl FromRef<ServerState> for GuardedAudioAnalyzer {
    fn from_ref(input: &ServerState) -> Self {
        input.audio.clone()
    }
}
