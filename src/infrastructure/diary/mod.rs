//! Diary service adapters

mod http_client;

pub use http_client::{DiaryClientConfig, HttpDiaryClient};
