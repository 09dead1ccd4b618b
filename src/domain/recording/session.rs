//! Capture session entity
//!
//! One contiguous recording from start to stop. Owned by the capturer and
//! never persisted: encoded chunks are released when the session is finished
//! or discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared elapsed-seconds counter, advanced once per second by the capture ticker
#[derive(Debug, Clone, Default)]
pub struct ElapsedCounter {
    seconds: Arc<AtomicU64>,
}

impl ElapsedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) {
        self.seconds.fetch_add(1, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.seconds.store(0, Ordering::SeqCst);
    }

    pub fn get(&self) -> u64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

/// A single recording in progress
#[derive(Debug)]
pub struct CaptureSession {
    chunks: Vec<Vec<u8>>,
}

impl CaptureSession {
    /// Begin a session. The counter is reset to zero.
    pub fn begin(elapsed: &ElapsedCounter) -> Self {
        elapsed.reset();
        Self { chunks: Vec::new() }
    }

    /// Append an encoded chunk. Empty chunks carry no data and are skipped.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// End the session and concatenate its chunks into one blob
    pub fn finish(mut self) -> Vec<u8> {
        let total = self.chunks.iter().map(Vec::len).sum();
        let mut blob = Vec::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            blob.extend_from_slice(&chunk);
        }
        blob
    }

    /// End the session and drop everything it captured
    pub fn discard(mut self) {
        self.chunks.clear();
    }
}
