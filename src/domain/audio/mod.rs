//! Encoded audio value objects

mod audio_data;

pub use audio_data::{AudioData, AudioMimeType};
