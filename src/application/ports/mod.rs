//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod diary_service;

// Re-export common types
pub use capture::{
    AudioCapture, CaptureError, CapturedAudio, ChunkReceiver, ChunkSender, InputDevice,
    InputStream,
};
pub use config::ConfigStore;
pub use diary_service::{DiaryService, ServiceError};
