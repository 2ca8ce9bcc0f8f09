//! Song identification from transcribed lyrics.

use super::vibe::strip_code_fences;
use crate::ai::{CompletionOptions, LlmError, LlmProvider, Message};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

const IDENTIFICATION_SYSTEM_PROMPT: &str = "You are a music identification expert. Identify \
songs from lyrics accurately. Always respond with valid JSON.";

#[derive(Debug, Clone, PartialEq)]
pub enum AudioRecognitionResult {
    NotRecognized,
    Recognized(RecognizedSong),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub confidence: Option<f64>,
}

impl AudioRecognitionResult {
    pub fn is_recognized(&self) -> bool {
        matches!(self, AudioRecognitionResult::Recognized(_))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionBody<'a> {
    recognized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    album: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

// Flat `{recognized, title, ...}` object on the wire.
impl Serialize for AudioRecognitionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            AudioRecognitionResult::NotRecognized => RecognitionBody {
                recognized: false,
                title: None,
                artist: None,
                album: None,
                release_date: None,
                confidence: None,
            },
            AudioRecognitionResult::Recognized(song) => RecognitionBody {
                recognized: true,
                title: Some(&song.title),
                artist: Some(&song.artist),
                album: song.album.as_deref(),
                release_date: song.release_date.as_deref(),
                confidence: song.confidence,
            },
        };
        body.serialize(serializer)
    }
}

/// Whether a transcript carries enough text to be worth identifying.
pub fn passes_transcript_gate(transcript: &str, min_chars: usize) -> bool {
    transcript.trim().chars().count() > min_chars
}

pub fn build_identification_prompt(transcript: &str) -> String {
    format!(
        r#"Identify the song from these lyrics: "{}"

If you can identify the song, respond with JSON:
{{
  "recognized": true,
  "title": "song title",
  "artist": "artist name",
  "album": "album name (if known)",
  "releaseDate": "release date (if known)",
  "confidence": 0.0-1.0
}}

If you cannot identify it, respond with:
{{
  "recognized": false
}}"#,
        transcript.trim()
    )
}

pub async fn identify(
    llm: &dyn LlmProvider,
    transcript: &str,
    options: &CompletionOptions,
) -> Result<AudioRecognitionResult, LlmError> {
    let messages = [
        Message::system(IDENTIFICATION_SYSTEM_PROMPT),
        Message::user(build_identification_prompt(transcript)),
    ];
    let response = llm.complete(&messages, options).await?;
    Ok(parse_recognition_response(&response.message.content))
}

/// Interpret the model's reply. Anything short of a positive answer with
/// both title and artist is `NotRecognized`.
pub fn parse_recognition_response(raw: &str) -> AudioRecognitionResult {
    let value: Value = match serde_json::from_str(strip_code_fences(raw)) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Recognition reply is not valid JSON");
            return AudioRecognitionResult::NotRecognized;
        }
    };

    if value.get("recognized").and_then(Value::as_bool) != Some(true) {
        return AudioRecognitionResult::NotRecognized;
    }

    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let (Some(title), Some(artist)) = (text("title"), text("artist")) else {
        debug!("Recognition reply lacks title or artist");
        return AudioRecognitionResult::NotRecognized;
    };

    AudioRecognitionResult::Recognized(RecognizedSong {
        title,
        artist,
        album: text("album"),
        release_date: text("releaseDate"),
        confidence: value
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gate_uses_trimmed_char_count() {
        assert!(!passes_transcript_gate("", 10));
        assert!(!passes_transcript_gate("hello", 10));
        assert!(!passes_transcript_gate("   0123456789   ", 10));
        assert!(passes_transcript_gate("01234567890", 10));
        // Multi-byte characters count once.
        assert!(!passes_transcript_gate("ééééééééé", 10));
    }

    #[test]
    fn prompt_quotes_transcript() {
        let prompt = build_identification_prompt(" is this the real life ");
        let opening = "Identify the song from these lyrics: \"is this the real life\"";
        assert!(prompt.starts_with(opening));
        assert!(prompt.contains("\"recognized\": false"));
    }

    #[test]
    fn parses_positive_identification() {
        let raw = r#"{"recognized": true, "title": "Bohemian Rhapsody", "artist": "Queen",
                      "album": "A Night at the Opera", "releaseDate": "1975", "confidence": 0.95}"#;
        let AudioRecognitionResult::Recognized(song) = parse_recognition_response(raw) else {
            panic!("expected recognition");
        };
        assert_eq!(song.title, "Bohemian Rhapsody");
        assert_eq!(song.artist, "Queen");
        assert_eq!(song.album.as_deref(), Some("A Night at the Opera"));
        assert_eq!(song.release_date.as_deref(), Some("1975"));
        assert_eq!(song.confidence, Some(0.95));
    }

    #[test]
    fn incomplete_or_negative_replies_are_not_recognized() {
        for raw in [
            "",
            "oops",
            r#"{"recognized": false}"#,
            r#"{"recognized": "true", "title": "x", "artist": "y"}"#,
            r#"{"recognized": true, "title": "x"}"#,
            r#"{"recognized": true, "title": " ", "artist": "y"}"#,
        ] {
            assert_eq!(
                parse_recognition_response(raw),
                AudioRecognitionResult::NotRecognized,
                "{raw}"
            );
        }
    }

    #[test]
    fn wire_shape() {
        assert_eq!(
            serde_json::to_value(AudioRecognitionResult::NotRecognized).unwrap(),
            json!({"recognized": false})
        );

        let song = AudioRecognitionResult::Recognized(RecognizedSong {
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album: None,
            release_date: Some("2001-01-01".to_string()),
            confidence: Some(0.5),
        });
        assert_eq!(
            serde_json::to_value(song).unwrap(),
            json!({
                "recognized": true,
                "title": "Song",
                "artist": "Band",
                "releaseDate": "2001-01-01",
                "confidence": 0.5
            })
        );
    }
}
