//! PCM to WAV conversion for provider audio.
//!
//! The provider returns mono signed 16-bit little-endian PCM at 24 kHz. We
//! store it as a mono 32-bit IEEE float WAV at the same rate.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;

/// Normalize s16le samples to floats in [-1, 1). A trailing odd byte is ignored.
pub fn pcm16_to_f32(pcm: &[u8]) -> Vec<f32> {
    pcm.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// Encode raw s16le PCM into a float WAV container
pub fn encode_wav(pcm: &[u8]) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in pcm16_to_f32(pcm) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Playback length of a PCM payload in seconds
pub fn pcm_duration_secs(pcm: &[u8]) -> f64 {
    (pcm.len() / 2) as f64 / SAMPLE_RATE as f64
}
