use super::RequestsLoggingLevel;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_METRICS_PORT: u16 = 9091;
/// Room for a 25 MiB recording after base64 expansion plus the JSON envelope.
pub const DEFAULT_MAX_REQUEST_BODY_BYTES: usize = 36 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub max_request_body_bytes: usize,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            max_request_body_bytes: DEFAULT_MAX_REQUEST_BODY_BYTES,
            cors_allowed_origins: Vec::new(),
        }
    }
}
