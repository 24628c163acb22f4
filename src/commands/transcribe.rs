//! Transcribe a pre-recorded audio file without recording.
//!
//! Accepts an audio file path and submits it through the same transcription
//! client the `record` command uses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;

use crate::config::MurmurConfig;
use crate::transcription::TranscriptionClient;

/// Handles transcription of a pre-recorded audio file.
///
/// # Arguments
/// * `file` - Path to the audio file to transcribe
/// * `output` - Optional file path to write output to instead of stdout
pub async fn handle_transcribe(file: PathBuf, output: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== murmur transcribe command ===");

    if !file.exists() {
        return Err(anyhow!("Audio file not found: {}", file.display()));
    }

    let config = MurmurConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        anyhow!("Configuration error: {e}")
    })?;

    let client = TranscriptionClient::new(
        &config.service.endpoint,
        Duration::from_secs(config.service.timeout_secs),
    )?;

    let audio = std::fs::read(&file)
        .map_err(|e| anyhow!("Failed to read audio file {}: {e}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "recording.wav".to_string());

    tracing::info!(
        "Transcribing file: {} ({} bytes)",
        file.display(),
        audio.len()
    );

    let text = client
        .transcribe(audio, &file_name, mime_for(&file))
        .await
        .map_err(|e| {
            tracing::error!("Transcription failed: {e}");
            anyhow!("Transcription failed: {e}")
        })?;

    super::write_transcription(&text, output)
}

/// Picks a mime type from the file extension; unknown extensions upload as a
/// generic binary attachment and let the service decide.
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") | Some("mpga") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a.wav")), "audio/wav");
        assert_eq!(mime_for(Path::new("a.MP3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("a.ogg")), "audio/ogg");
        assert_eq!(mime_for(Path::new("a")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("a.xyz")), "application/octet-stream");
    }
}
