//! Voice Diary - spoken diary client
//!
//! Records speech from the microphone, submits it to a diary service that
//! transcribes and structures it, and presents the resulting entries.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Diary records, capture session, view state, and errors
//! - **Application**: The capturer, the view controller, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal microphone, HTTP client, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
