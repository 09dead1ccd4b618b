mod app_config;

pub use app_config::{AppConfig, DEFAULT_API_URL, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
