//! In-memory WAV container for upload.
//!
//! The finalized buffer holds raw i16 little-endian mono PCM; the
//! transcription service expects a playable file, so the bytes are wrapped
//! in a WAV header without any transcoding.

use std::io::Cursor;

use anyhow::{anyhow, Result};
use hound::WavWriter;

use super::session::AudioBuffer;

/// Wraps the buffer's PCM content in a WAV container, in memory.
///
/// # Errors
/// - If the buffer's byte length is not a whole number of i16 samples
pub fn wrap_pcm(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    if buffer.len() % 2 != 0 {
        return Err(anyhow!(
            "Audio buffer has a partial sample ({} bytes)",
            buffer.len()
        ));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for chunk in buffer.bytes().chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
