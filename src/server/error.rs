//! HTTP error responses.

use crate::audio::AudioError;
use crate::server::metrics::record_error;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent something unusable (400).
    #[error("{message}")]
    InvalidInput {
        message: String,
        details: Vec<FieldIssue>,
    },

    /// Anything else (500). `public` is sent to the client, `detail` is only logged.
    #[error("{public}: {detail}")]
    Internal {
        public: &'static str,
        detail: String,
        endpoint: &'static str,
    },
}

impl ApiError {
    pub fn invalid_request(details: Vec<FieldIssue>) -> Self {
        ApiError::InvalidInput {
            message: "Invalid request".to_string(),
            details,
        }
    }

    /// Map a pipeline error, naming the endpoint for logs and metrics.
    pub fn from_audio(err: AudioError, public: &'static str, endpoint: &'static str) -> Self {
        if err.is_client_error() {
            ApiError::invalid_request(vec![FieldIssue::new("audioData", err.to_string())])
        } else {
            ApiError::Internal {
                public,
                detail: err.to_string(),
                endpoint,
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request(vec![FieldIssue::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput {
            message: "Invalid search parameters".to_string(),
            details: vec![FieldIssue::new("query", rejection.body_text())],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput { message, details } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
            ApiError::Internal {
                public,
                detail,
                endpoint,
            } => {
                error!(endpoint, "{}: {}", public, detail);
                record_error("internal", endpoint);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": public })),
                )
                    .into_response()
            }
        }
    }
}
