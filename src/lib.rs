//! Music discovery backend.
//!
//! Aggregates music search across several providers and analyses short
//! recordings (vibe matching, lyric-based song recognition) through
//! OpenAI-compatible speech and completion services.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod ai;
pub mod audio;
pub mod config;
pub mod providers;
pub mod search;
pub mod server;

// Re-export commonly used types for convenience
pub use search::SearchAggregator;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
