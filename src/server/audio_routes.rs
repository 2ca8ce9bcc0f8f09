//! Audio analysis routes: vibe matching and song recognition.

use crate::audio::{AudioRecognitionResult, VibeMatchResult};

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::error::{ApiError, FieldIssue};
use super::state::{GuardedAudioAnalyzer, ServerState};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VibeMatchRequest {
    audio_data: String,
    duration: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AudioRecognitionRequest {
    audio_data: String,
    duration: f64,
}

/// Recording length in seconds, as reported by the client.
fn validate_duration(duration: Option<f64>) -> Result<(), ApiError> {
    match duration {
        Some(d) if !d.is_finite() || d < 0.0 => Err(ApiError::invalid_request(vec![
            FieldIssue::new("duration", "must be a non-negative number of seconds"),
        ])),
        _ => Ok(()),
    }
}

/// POST /api/vibe-match
async fn vibe_match(
    State(audio): State<GuardedAudioAnalyzer>,
    body: Result<Json<VibeMatchRequest>, JsonRejection>,
) -> Result<Json<VibeMatchResult>, ApiError> {
    let Json(request) = body?;
    validate_duration(request.duration)?;

    let result = audio
        .vibe_match(&request.audio_data)
        .await
        .map_err(|e| ApiError::from_audio(e, "Vibe matching failed", "/api/vibe-match"))?;

    info!(
        vibes = result.vibes.len(),
        duration = ?request.duration,
        "Vibe match served"
    );
    Ok(Json(result))
}

/// POST /api/recognize
async fn recognize(
    State(audio): State<GuardedAudioAnalyzer>,
    body: Result<Json<AudioRecognitionRequest>, JsonRejection>,
) -> Result<Json<AudioRecognitionResult>, ApiError> {
    let Json(request) = body?;
    validate_duration(Some(request.duration))?;

    let result = audio
        .recognize(&request.audio_data)
        .await
        .map_err(|e| ApiError::from_audio(e, "Audio recognition failed", "/api/recognize"))?;

    info!(
        recognized = result.is_recognized(),
        duration = request.duration,
        "Recognition served"
    );
    Ok(Json(result))
}

pub fn make_audio_routes(state: ServerState) -> Router {
    Router::new()
        .route("/vibe-match", post(vibe_match))
        .route("/recognize", post(recognize))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_must_be_finite_and_non_negative() {
        assert!(validate_duration(None).is_ok());
        assert!(validate_duration(Some(0.0)).is_ok());
        assert!(validate_duration(Some(12.5)).is_ok());
        assert!(validate_duration(Some(-1.0)).is_err());
        assert!(validate_duration(Some(f64::NAN)).is_err());
        assert!(validate_duration(Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn request_bodies_are_camel_case() {
        let vibe: VibeMatchRequest = serde_json::from_str(r#"{"audioData": "aGk="}"#).unwrap();
        assert_eq!(vibe.audio_data, "aGk=");
        assert_eq!(vibe.duration, None);

        let missing_duration =
            serde_json::from_str::<AudioRecognitionRequest>(r#"{"audioData": "aGk="}"#);
        assert!(missing_duration.is_err());
    }
}
