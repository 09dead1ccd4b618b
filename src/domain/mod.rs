//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod diary;
pub mod error;
pub mod recording;
pub mod view;

// Re-export common types
pub use audio::{AudioData, AudioMimeType};
pub use config::AppConfig;
pub use diary::{DiaryEntry, DiaryListItem, DiaryPage, Mood, SearchResults};
pub use error::*;
pub use recording::{CaptureSession, Duration, ElapsedCounter};
pub use view::{ErrorSurface, InvalidIntent, ViewKind, ViewSession, ViewState};
