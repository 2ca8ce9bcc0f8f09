//! Vibe classification of a transcript through a JSON-mode completion.

use super::vocabulary::{canonical_vibe, vocabulary_prompt_list};
use crate::ai::{CompletionOptions, LlmError, LlmProvider, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const NO_TRANSCRIPT_MARKER: &str = "Audio was hummed or instrumental";

const VIBE_SYSTEM_PROMPT: &str = "You are an expert music analyst specializing in identifying \
musical vibes and emotions. Always respond with valid JSON.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeMatchResult {
    pub vibes: Vec<Vibe>,
    pub suggested_search_terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vibe {
    pub name: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The completion service could not be reached or refused the request.
/// A reply that does not parse is not an error, see [`parse_vibe_response`].
#[derive(Debug, Error)]
#[error("classification failed: {0}")]
pub struct ClassificationError(#[from] pub LlmError);

pub fn build_vibe_prompt(transcript: &str) -> String {
    let transcript = transcript.trim();
    let audio_line = if transcript.is_empty() {
        NO_TRANSCRIPT_MARKER.to_string()
    } else {
        format!("Transcribed audio: {}", transcript)
    };

    format!(
        r#"You are a music vibe analyzer. Analyze the following hummed/sung melody or audio description and identify the musical vibes, mood, and suggest search terms for finding similar songs.

{audio_line}

Identify:
1. Top 5 musical vibes from this list: {vocabulary}
2. Overall mood and tempo
3. 4-6 specific search terms that would help find similar songs
4. Genre suggestions

Respond in JSON format:
{{
  "vibes": [{{"name": "vibe_name", "confidence": 0.0-1.0, "description": "brief explanation"}}],
  "mood": "overall mood description",
  "tempo": "fast/moderate/slow",
  "genre": "genre suggestion",
  "suggestedSearchTerms": ["search term 1", "search term 2", ...]
}}"#,
        audio_line = audio_line,
        vocabulary = vocabulary_prompt_list(),
    )
}

/// Ask the model to classify `transcript` (possibly empty).
pub async fn classify(
    llm: &dyn LlmProvider,
    transcript: &str,
    options: &CompletionOptions,
) -> Result<VibeMatchResult, ClassificationError> {
    let messages = [
        Message::system(VIBE_SYSTEM_PROMPT),
        Message::user(build_vibe_prompt(transcript)),
    ];
    let response = llm.complete(&messages, options).await?;
    debug!(
        finish_reason = ?response.finish_reason,
        chars = response.message.content.len(),
        "Vibe classification reply received"
    );
    Ok(parse_vibe_response(&response.message.content))
}

/// Shape a model reply into a [`VibeMatchResult`].
///
/// Never fails: anything that is not a JSON object yields the empty result,
/// and individual malformed entries are skipped.
pub fn parse_vibe_response(raw: &str) -> VibeMatchResult {
    let value: Value = match serde_json::from_str(strip_code_fences(raw)) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Vibe reply is not valid JSON");
            return VibeMatchResult::default();
        }
    };
    let Some(object) = value.as_object() else {
        return VibeMatchResult::default();
    };

    let vibes = object
        .get("vibes")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_vibe).collect())
        .unwrap_or_default();

    let suggested_search_terms = object
        .get("suggestedSearchTerms")
        .and_then(Value::as_array)
        .map(|terms| {
            terms
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    VibeMatchResult {
        vibes,
        suggested_search_terms,
        mood: non_empty_string(object.get("mood")),
        genre: non_empty_string(object.get("genre")),
        tempo: non_empty_string(object.get("tempo")),
    }
}

fn parse_vibe(entry: &Value) -> Option<Vibe> {
    let name = canonical_vibe(entry.get("name")?.as_str()?)?;
    let confidence = entry
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(0.0);
    Some(Vibe {
        name: name.to_string(),
        confidence,
        description: non_empty_string(entry.get("description")),
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Remove a surrounding markdown code fence, if any.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") up to the first newline.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
