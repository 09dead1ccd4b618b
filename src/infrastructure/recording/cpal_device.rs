//! Microphone input using cpal
//!
//! cpal::Stream is not Send, so each opened stream lives on its own thread
//! for the whole session. The callback mixes to mono and buffers i16 PCM;
//! `finish` stops the thread (releasing the device), resamples to 16kHz and
//! delivers the encoded recording as a single chunk.

use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, PlayStreamError, SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;

use super::encoder::{encode_for_upload, TARGET_SAMPLE_RATE};
use crate::application::ports::{CaptureError, ChunkSender, InputDevice, InputStream};
use crate::domain::audio::AudioMimeType;

type SampleBuffer = Arc<StdMutex<Vec<i16>>>;

/// The host's default input device
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalInputDevice;

impl CpalInputDevice {
    pub fn new() -> Self {
        Self
    }

    fn default_device() -> Result<cpal::Device, CaptureError> {
        cpal::default_host()
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no input device found".into()))
    }

    /// Pick an i16 or f32 config, preferring mono and a range that includes 16kHz
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported = device.supported_input_configs().map_err(|e| {
            CaptureError::DeviceUnavailable(format!("failed to query input configs: {}", e))
        })?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or_else(|| {
            CaptureError::DeviceUnavailable("no supported sample format".into())
        })?;

        let sample_rate = if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        Ok((
            StreamConfig {
                channels: range.channels(),
                sample_rate,
                buffer_size: cpal::BufferSize::Default,
            },
            range.sample_format(),
        ))
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        format: SampleFormat,
        buffer: SampleBuffer,
    ) -> Result<cpal::Stream, CaptureError> {
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| tracing::warn!(error = %err, "audio stream error");

        let stream = match format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mono = mix_to_mono(data, channels);
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(&mono);
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let pcm: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    let mono = mix_to_mono(&pcm, channels);
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(&mono);
                    }
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::DeviceUnavailable(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        };

        stream.map_err(map_build_error)
    }

    /// Body of the stream thread: acquire, report readiness, hold until stopped
    fn run_stream(
        buffer: SampleBuffer,
        ready: oneshot::Sender<Result<u32, CaptureError>>,
        stop: std_mpsc::Receiver<()>,
    ) {
        let acquired = Self::default_device().and_then(|device| {
            let (config, format) = Self::input_config(&device)?;
            let stream = Self::build_stream(&device, &config, format, buffer)?;
            stream.play().map_err(map_play_error)?;
            Ok((stream, config.sample_rate.0))
        });

        match acquired {
            Ok((stream, sample_rate)) => {
                if ready.send(Ok(sample_rate)).is_err() {
                    return;
                }
                // Blocks until a stop signal arrives or the sender is dropped
                let _ = stop.recv();
                drop(stream);
                tracing::debug!("input stream released");
            }
            Err(e) => {
                let _ = ready.send(Err(e));
            }
        }
    }
}

#[async_trait]
impl InputDevice for CpalInputDevice {
    async fn open(&self, chunks: ChunkSender) -> Result<Box<dyn InputStream>, CaptureError> {
        let buffer: SampleBuffer = Arc::new(StdMutex::new(Vec::new()));
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();

        let thread_buffer = Arc::clone(&buffer);
        let thread = std::thread::Builder::new()
            .name("voice-diary-capture".into())
            .spawn(move || Self::run_stream(thread_buffer, ready_tx, stop_rx))
            .map_err(|e| CaptureError::DeviceUnavailable(format!("failed to spawn: {}", e)))?;

        let sample_rate = match ready_rx.await {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(CaptureError::DeviceUnavailable(
                    "capture thread exited unexpectedly".into(),
                ));
            }
        };

        tracing::debug!(sample_rate, "input stream acquired");
        Ok(Box::new(CpalInputStream {
            buffer,
            sample_rate,
            chunks,
            stop: Some(stop_tx),
            thread: Some(thread),
        }))
    }
}

/// An open microphone stream
pub struct CpalInputStream {
    buffer: SampleBuffer,
    sample_rate: u32,
    chunks: ChunkSender,
    stop: Option<std_mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl CpalInputStream {
    /// Stop the stream thread and wait for it to drop the device. Idempotent.
    fn release(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl InputStream for CpalInputStream {
    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Flac
    }

    fn finish(mut self: Box<Self>) -> Result<AudioMimeType, CaptureError> {
        self.release();

        let samples = self
            .buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .map_err(|_| CaptureError::EncodingFailed("sample buffer poisoned".into()))?;

        if samples.is_empty() {
            return Ok(self.mime_type());
        }

        let resampled = resample_to_16k(&samples, self.sample_rate)?;
        let audio = encode_for_upload(&resampled)
            .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;
        let mime_type = audio.mime_type();

        // The capturer drains the channel after finish returns
        let _ = self.chunks.send(audio.into_data());
        Ok(mime_type)
    }
}

impl Drop for CpalInputStream {
    fn drop(&mut self) {
        self.release();
    }
}

fn map_build_error(err: BuildStreamError) -> CaptureError {
    match err {
        BuildStreamError::DeviceNotAvailable => {
            CaptureError::DeviceUnavailable("device not available".into())
        }
        BuildStreamError::BackendSpecific { err } if looks_like_permission(&err.description) => {
            CaptureError::PermissionDenied
        }
        other => CaptureError::DeviceUnavailable(other.to_string()),
    }
}

fn map_play_error(err: PlayStreamError) -> CaptureError {
    match err {
        PlayStreamError::DeviceNotAvailable => {
            CaptureError::DeviceUnavailable("device not available".into())
        }
        PlayStreamError::BackendSpecific { err } if looks_like_permission(&err.description) => {
            CaptureError::PermissionDenied
        }
        other => CaptureError::DeviceUnavailable(other.to_string()),
    }
}

fn looks_like_permission(description: &str) -> bool {
    let lower = description.to_lowercase();
    lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
}

/// Average interleaved channels into one
fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, CaptureError> {
    if source_rate == TARGET_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();
    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        1024,
        2,
        1,
    )
    .map_err(|e| CaptureError::EncodingFailed(format!("resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len);
    let mut pos = 0;
    while pos < samples_f32.len() {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(samples_f32.len());
        let mut chunk = samples_f32[pos..end].to_vec();
        chunk.resize(needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| CaptureError::EncodingFailed(format!("resampling failed: {}", e)))?;
        output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
        pos = end;
    }

    output.truncate(output_len);
    Ok(output)
}
