//! Base64 audio payloads turned into short-lived files on disk.

use super::AudioError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const TEMP_FILE_SUFFIX: &str = ".webm";

/// Which pipeline a recording belongs to. Only affects the temp file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioPurpose {
    VibeMatch,
    Recognition,
}

impl AudioPurpose {
    fn file_prefix(&self) -> &'static str {
        match self {
            AudioPurpose::VibeMatch => "vibe-",
            AudioPurpose::Recognition => "recognize-",
        }
    }
}

/// Recorded audio that lives on disk for the duration of one request.
///
/// Owned by exactly one pipeline run. The file is removed by [`release`]
/// on the normal path and by the drop of the inner [`NamedTempFile`] on
/// every other one (early return, error, panic unwinding).
///
/// [`release`]: TransientAudio::release
#[derive(Debug)]
pub struct TransientAudio {
    file: NamedTempFile,
}

impl TransientAudio {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now. A failed unlink is only logged: the caller
    /// already has what it needed from the audio.
    pub fn release(self) {
        let path = self.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!(path = %path.display(), "Released transient audio"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove transient audio"),
        }
    }
}

pub struct AudioIngestor {
    temp_dir: Option<PathBuf>,
    max_audio_bytes: usize,
}

impl AudioIngestor {
    /// `temp_dir` of `None` uses the OS temp directory.
    pub fn new(temp_dir: Option<PathBuf>, max_audio_bytes: usize) -> Self {
        Self {
            temp_dir,
            max_audio_bytes,
        }
    }

    /// Decode `audio_base64` and write it to a uniquely named temp file.
    pub async fn ingest(
        &self,
        audio_base64: &str,
        purpose: AudioPurpose,
    ) -> Result<TransientAudio, AudioError> {
        let bytes = decode_audio_payload(audio_base64, self.max_audio_bytes)?;

        let mut builder = tempfile::Builder::new();
        builder
            .prefix(purpose.file_prefix())
            .suffix(TEMP_FILE_SUFFIX);
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(AudioError::Io)?;

        // On failure `file` is dropped here, which removes the partial artifact.
        tokio::fs::write(file.path(), &bytes)
            .await
            .map_err(AudioError::Io)?;

        debug!(
            path = %file.path().display(),
            size = bytes.len(),
            ?purpose,
            "Stored transient audio"
        );

        Ok(TransientAudio { file })
    }
}

/// Decode a base64 audio payload, optionally wrapped as a `data:` URL.
///
/// Whitespace anywhere in the payload is ignored.
pub fn decode_audio_payload(raw: &str, max_audio_bytes: usize) -> Result<Vec<u8>, AudioError> {
    let payload = strip_data_url_prefix(raw.trim());
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(AudioError::EmptyPayload);
    }

    // Reject oversized payloads before allocating the decoded buffer.
    let estimated = compact.len() / 4 * 3;
    if estimated > max_audio_bytes.saturating_add(3) {
        return Err(AudioError::PayloadTooLarge {
            size: estimated,
            max: max_audio_bytes,
        });
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AudioError::InvalidPayload(e.to_string()))?;

    if bytes.is_empty() {
        return Err(AudioError::EmptyPayload);
    }
    if bytes.len() > max_audio_bytes {
        return Err(AudioError::PayloadTooLarge {
            size: bytes.len(),
            max: max_audio_bytes,
        });
    }
    Ok(bytes)
}

fn strip_data_url_prefix(raw: &str) -> &str {
    if raw.starts_with("data:") {
        if let Some((_, rest)) = raw.split_once(',') {
            return rest;
        }
    }
    raw
}
