//! Audio capture port interfaces
//!
//! Two seams: [`AudioCapture`] is the capability the controller drives
//! (`start`/`stop`), and [`InputDevice`]/[`InputStream`] is the platform
//! microphone primitive the capturer is built on. Platform bindings implement
//! the latter; tests substitute doubles that synthesize deterministic chunks.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::{AudioData, AudioMimeType};

/// Capture errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Microphone access was denied")]
    PermissionDenied,

    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Failed to encode recording: {0}")]
    EncodingFailed(String),

    #[error("No audio data captured")]
    EmptyRecording,
}

/// The single artifact produced by a completed capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub audio: AudioData,
    pub duration_secs: u64,
}

/// Capability interface for one-session-at-a-time audio capture
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the microphone and begin a session.
    ///
    /// Fails with `AlreadyRecording` if a session is active; the active
    /// session is left untouched.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Finish the active session and release the microphone.
    ///
    /// Fails with `NotRecording` if no session is active.
    async fn stop(&self) -> Result<CapturedAudio, CaptureError>;

    /// Drop the active session (if any) and release the microphone.
    async fn abort(&self);

    /// Check if a session is active
    fn is_recording(&self) -> bool;

    /// Seconds elapsed in the current session, as counted by the ticker
    fn elapsed_secs(&self) -> u64;
}

/// Channel on which an input stream delivers encoded chunks
pub type ChunkSender = mpsc::UnboundedSender<Vec<u8>>;

/// Receiving end of [`ChunkSender`]
pub type ChunkReceiver = mpsc::UnboundedReceiver<Vec<u8>>;

/// Platform microphone primitive
#[async_trait]
pub trait InputDevice: Send + Sync {
    /// Acquire an audio-only input stream that delivers encoded chunks to `chunks`.
    ///
    /// On error nothing stays acquired.
    async fn open(&self, chunks: ChunkSender) -> Result<Box<dyn InputStream>, CaptureError>;
}

/// An acquired input stream.
///
/// Dropping the stream releases the underlying device, whether or not
/// [`InputStream::finish`] was called.
pub trait InputStream: Send {
    /// Container the delivered chunks belong to
    fn mime_type(&self) -> AudioMimeType;

    /// Finalize the encoder, flush the remaining chunks, and release the device.
    ///
    /// May block; callers run it off the async executor.
    fn finish(self: Box<Self>) -> Result<AudioMimeType, CaptureError>;
}
