//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Page size for collection views
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size the diary service accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub page_limit: Option<u32>,
    pub max_display_duration: Option<String>,
    pub request_timeout: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            page_limit: Some(DEFAULT_PAGE_LIMIT),
            max_display_duration: Some(Duration::default_max_display().to_string()),
            request_timeout: Some(Duration::default_request_timeout().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_url: other.api_url.or(self.api_url),
            page_limit: other.page_limit.or(self.page_limit),
            max_display_duration: other.max_display_duration.or(self.max_display_duration),
            request_timeout: other.request_timeout.or(self.request_timeout),
        }
    }

    /// Base URL without a trailing slash
    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Page limit clamped to what the service accepts
    pub fn page_limit_or_default(&self) -> u32 {
        self.page_limit
            .filter(|limit| (1..=MAX_PAGE_LIMIT).contains(limit))
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn max_display_or_default(&self) -> Duration {
        self.max_display_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_display)
    }

    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_request_timeout)
    }
}
