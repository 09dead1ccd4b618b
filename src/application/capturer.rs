//! Audio capturer
//!
//! Manages the lifecycle of one recording session on top of a platform
//! [`InputDevice`]: at most one session at a time, an elapsed-seconds ticker
//! while recording, and release of the device on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::domain::audio::AudioData;
use crate::domain::recording::{CaptureSession, Duration, ElapsedCounter};

use super::ports::{
    AudioCapture, CaptureError, CapturedAudio, ChunkReceiver, InputDevice, InputStream,
};

const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Capturer settings
#[derive(Debug, Clone, Copy)]
pub struct CaptureSettings {
    /// Cap applied to the elapsed counter for display. Recording is not stopped.
    pub max_display: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            max_display: Duration::default_max_display(),
        }
    }
}

/// Aborts the ticker task when dropped
struct Ticker(JoinHandle<()>);

impl Ticker {
    fn spawn(elapsed: ElapsedCounter) -> Self {
        Self(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                elapsed.tick();
            }
        }))
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Everything held for the duration of one session
struct ActiveCapture {
    session: CaptureSession,
    stream: Box<dyn InputStream>,
    chunks: ChunkReceiver,
    _ticker: Ticker,
    started_at: Instant,
}

/// Audio capturer over a platform input device
pub struct AudioCapturer<D: InputDevice> {
    device: D,
    active: Mutex<Option<ActiveCapture>>,
    recording: AtomicBool,
    elapsed: ElapsedCounter,
    settings: CaptureSettings,
}

impl<D: InputDevice> AudioCapturer<D> {
    pub fn new(device: D) -> Self {
        Self::with_settings(device, CaptureSettings::default())
    }

    pub fn with_settings(device: D, settings: CaptureSettings) -> Self {
        Self {
            device,
            active: Mutex::new(None),
            recording: AtomicBool::new(false),
            elapsed: ElapsedCounter::new(),
            settings,
        }
    }

    pub fn settings(&self) -> CaptureSettings {
        self.settings
    }

    /// Elapsed seconds clamped to the display cap
    pub fn display_elapsed_secs(&self) -> u64 {
        self.elapsed.get().min(self.settings.max_display.as_secs())
    }
}

#[async_trait]
impl<D: InputDevice> AudioCapture for AudioCapturer<D> {
    async fn start(&self) -> Result<(), CaptureError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            tracing::debug!("start ignored: capture already in progress");
            return Err(CaptureError::AlreadyRecording);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let stream = self.device.open(tx).await.map_err(|e| {
            tracing::warn!(error = %e, "failed to acquire input device");
            e
        })?;

        let session = CaptureSession::begin(&self.elapsed);
        *active = Some(ActiveCapture {
            session,
            stream,
            chunks: rx,
            _ticker: Ticker::spawn(self.elapsed.clone()),
            started_at: Instant::now(),
        });
        self.recording.store(true, Ordering::SeqCst);

        tracing::info!("capture started");
        Ok(())
    }

    async fn stop(&self) -> Result<CapturedAudio, CaptureError> {
        let capture = self
            .active
            .lock()
            .await
            .take()
            .ok_or(CaptureError::NotRecording)?;
        self.recording.store(false, Ordering::SeqCst);

        let ActiveCapture {
            mut session,
            stream,
            mut chunks,
            _ticker,
            started_at,
        } = capture;
        drop(_ticker);
        let duration_secs = started_at.elapsed().as_secs();

        // The stream is consumed by `finish`, which releases the device even on error.
        let finished = tokio::task::spawn_blocking(move || stream.finish())
            .await
            .map_err(|e| CaptureError::EncodingFailed(format!("Encoder task failed: {}", e)))
            .and_then(|result| result);

        let mime_type = match finished {
            Ok(mime_type) => mime_type,
            Err(e) => {
                tracing::warn!(error = %e, "capture finalization failed");
                session.discard();
                return Err(e);
            }
        };

        while let Ok(chunk) = chunks.try_recv() {
            session.push_chunk(chunk);
        }
        let blob = session.finish();
        if blob.is_empty() {
            return Err(CaptureError::EmptyRecording);
        }

        let audio = AudioData::new(blob, mime_type);
        tracing::info!(
            duration_secs,
            size = %audio.human_readable_size(),
            mime = %audio.mime_type(),
            "capture stopped"
        );
        Ok(CapturedAudio {
            audio,
            duration_secs,
        })
    }

    async fn abort(&self) {
        let capture = self.active.lock().await.take();
        self.recording.store(false, Ordering::SeqCst);

        if let Some(capture) = capture {
            let ActiveCapture {
                session, stream, ..
            } = capture;
            // Releasing a platform stream may join its capture thread.
            if let Err(e) = tokio::task::spawn_blocking(move || drop(stream)).await {
                tracing::warn!(error = %e, "device release task failed");
            }
            session.discard();
            tracing::info!("capture aborted");
        }
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn elapsed_secs(&self) -> u64 {
        self.elapsed.get()
    }
}
