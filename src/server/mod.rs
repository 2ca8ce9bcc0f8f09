mod audio_routes;
pub mod config;
pub mod error;
mod http_layers;
pub mod metrics;
mod search;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, FieldIssue};
pub use http_layers::*;
pub use server::{make_app, make_metrics_app, run_server};
pub use state::ServerState;
