//! Application layer - Use cases and port interfaces
//!
//! Contains the capture lifecycle, the view controller, and the trait
//! definitions for external system interactions.

pub mod capturer;
pub mod controller;
pub mod ports;

// Re-export use cases
pub use capturer::{AudioCapturer, CaptureSettings};
pub use controller::{ControllerError, DiaryViewController, ListLoadPolicy, ViewCallbacks};
