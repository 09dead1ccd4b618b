//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the microphone, the diary
//! service, and the config file.

pub mod config;
pub mod diary;
pub mod recording;

// Re-export adapters
pub use config::XdgConfigStore;
pub use diary::{DiaryClientConfig, HttpDiaryClient};
pub use recording::{create_capturer, CpalInputDevice};
