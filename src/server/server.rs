use anyhow::{Context, Result};
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use super::audio_routes::make_audio_routes;
use super::search::make_search_routes;
use super::{log_requests, metrics, state::ServerState};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub providers: Vec<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        providers: state
            .aggregator
            .platforms()
            .iter()
            .map(|p| p.to_string())
            .collect(),
    };
    Json(stats)
}

fn make_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

pub fn make_app(state: ServerState) -> Router {
    let api_routes = make_search_routes(state.clone()).merge(make_audio_routes(state.clone()));

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.max_request_body_bytes))
        .layer(make_cors_layer(&state.config.cors_allowed_origins))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics::metrics_handler))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Serve the API and the metrics endpoint until ctrl-c.
pub async fn run_server(state: ServerState) -> Result<()> {
    metrics::init_metrics();

    let port = state.config.port;
    let metrics_port = state.config.metrics_port;
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind API port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Serving API on port {}", port);
    info!("Serving metrics on port {}", metrics_port);

    let api = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let metrics =
        axum::serve(metrics_listener, make_metrics_app()).with_graceful_shutdown(shutdown_signal());

    tokio::try_join!(
        async { api.await.context("API server failed") },
        async { metrics.await.context("Metrics server failed") },
    )?;
    Ok(())
}
