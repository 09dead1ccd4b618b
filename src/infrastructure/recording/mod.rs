//! Recording infrastructure module
//!
//! Microphone input via cpal, encoded to FLAC (WAV as a fallback) for upload.

mod cpal_device;
mod encoder;

pub use cpal_device::{CpalInputDevice, CpalInputStream};
pub use encoder::{encode_for_upload, encode_to_flac, encode_to_wav, EncodingError, TARGET_SAMPLE_RATE};

use crate::application::{AudioCapturer, CaptureSettings};

/// Create the capturer for the current platform's default microphone
pub fn create_capturer(settings: CaptureSettings) -> AudioCapturer<CpalInputDevice> {
    AudioCapturer::with_settings(CpalInputDevice::new(), settings)
}
