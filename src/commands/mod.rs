//! Application command handlers for murmur.
//!
//! # Commands
//! - `record`: Capture from the microphone and transcribe the result
//! - `transcribe`: Submit a pre-recorded audio file
//! - `list_devices`: List available audio input devices
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod record;
pub mod transcribe;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
pub use transcribe::handle_transcribe;

/// Writes the transcription to the requested destination: a file when
/// `output` is set, stdout otherwise.
pub(crate) fn write_transcription(text: &str, output: Option<String>) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(&path, text)
            .map_err(|e| anyhow::anyhow!("Failed to write to file '{path}': {e}"))?;
        tracing::debug!("Transcribed text written to file: {path}");
    } else {
        println!("{text}");
        tracing::debug!("Transcribed text printed to stdout");
    }
    Ok(())
}
