//! Shared constants for end-to-end tests
//!
//! When test payloads or timing budgets change, update only this file.

// ============================================================================
// Audio Payloads
// ============================================================================

/// A few bytes of a WebM (EBML) header, base64 encoded.
///
/// The stub transcriber never decodes audio, so any non-empty payload works.
pub const SAMPLE_AUDIO_BASE64: &str = "GkXfo6NChoEBQveBAULygQRC84EIQoKEd2VibQ==";

/// Decoded length of [`SAMPLE_AUDIO_BASE64`].
pub const SAMPLE_AUDIO_LEN: u64 = 28;

/// Upload limit used by every test server.
pub const TEST_MAX_AUDIO_BYTES: usize = 1024 * 1024;

/// Long enough to pass the recognition transcript gate.
pub const LYRIC_TRANSCRIPT: &str = "is this the real life, is this just fantasy";

/// Five characters: below the recognition transcript gate.
pub const SHORT_TRANSCRIPT: &str = "la la";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// HTTP request timeout (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Per-provider budget used by test servers (milliseconds)
pub const PROVIDER_TIMEOUT_MS: u64 = 500;
