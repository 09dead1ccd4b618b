//! Upload encoding
//!
//! Recordings are uploaded as FLAC (lossless, roughly 40% of WAV size):
//! - 16kHz sample rate (speech-optimized)
//! - Mono channel
//! - 16-bit samples
//!
//! If the FLAC encoder rejects the input, the same samples are wrapped in a
//! plain WAV container instead.

use std::io::Cursor;

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use hound::{WavSpec, WavWriter};

use crate::domain::audio::{AudioData, AudioMimeType};

/// Target sample rate for speech-optimized encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Number of channels (mono)
const CHANNELS: usize = 1;

/// Encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("FLAC write failed: {0}")]
    Write(String),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Encode mono i16 samples at 16kHz to FLAC bytes
pub fn encode_to_flac(pcm_samples: &[i16]) -> Result<Vec<u8>, EncodingError> {
    // flacenc works on i32
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS,
        BITS_PER_SAMPLE,
        TARGET_SAMPLE_RATE as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Write(e.to_string()))?;

    Ok(sink.into_inner())
}

/// Wrap mono i16 samples in a WAV container
pub fn encode_to_wav(pcm_samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let spec = WavSpec {
        channels: CHANNELS as u16,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE as u16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in pcm_samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Encode 16kHz mono samples for upload, falling back to WAV if FLAC fails
pub fn encode_for_upload(pcm_samples: &[i16]) -> Result<AudioData, EncodingError> {
    match encode_to_flac(pcm_samples) {
        Ok(bytes) => Ok(AudioData::new(bytes, AudioMimeType::Flac)),
        Err(e) => {
            tracing::warn!(error = %e, "FLAC encoding failed; falling back to WAV");
            let bytes = encode_to_wav(pcm_samples, TARGET_SAMPLE_RATE)?;
            Ok(AudioData::new(bytes, AudioMimeType::Wav))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let t = i as f32 / TARGET_SAMPLE_RATE as f32;
                (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 16000.0) as i16
            })
            .collect()
    }

    #[test]
    fn encode_silence() {
        let silence = vec![0i16; TARGET_SAMPLE_RATE as usize];
        let flac_data = encode_to_flac(&silence).unwrap();

        assert!(flac_data.len() > 50);
        assert_eq!(&flac_data[0..4], b"fLaC");
    }

    #[test]
    fn flac_compresses_signal() {
        let samples = sine(TARGET_SAMPLE_RATE as usize);
        let flac_data = encode_to_flac(&samples).unwrap();
        assert!(flac_data.len() < samples.len() * 2);
    }

    #[test]
    fn wav_has_riff_header_and_all_samples() {
        let samples = sine(1600);
        let wav = encode_to_wav(&samples, TARGET_SAMPLE_RATE).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte canonical header plus 2 bytes per sample
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn upload_prefers_flac() {
        let audio = encode_for_upload(&sine(1600)).unwrap();
        assert_eq!(audio.mime_type(), AudioMimeType::Flac);
        assert_eq!(audio.file_name(), "recording.flac");
    }
}
