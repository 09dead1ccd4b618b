//! Recording value objects and the capture session entity

mod duration;
mod session;

pub use duration::{
    format_clock, Duration, DEFAULT_MAX_DISPLAY_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use session::{CaptureSession, ElapsedCounter};
