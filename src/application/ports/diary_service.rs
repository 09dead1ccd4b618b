//! Diary service port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioData;
use crate::domain::diary::{DiaryEntry, DiaryPage, SearchResults};

/// Diary service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{detail}")]
    Service { status: u16, detail: String },

    #[error("Unexpected response from diary service: {0}")]
    Decode(String),
}

impl ServiceError {
    /// True when the service reported the requested entry does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Service { status: 404, .. })
    }

    /// Detail message supplied by the service, if it supplied a non-empty one
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Service { detail, .. } if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }
}

/// Port for the remote diary service.
///
/// Pure transport: no retries, no caching, no re-ordering of results.
#[async_trait]
pub trait DiaryService: Send + Sync {
    /// Upload a recording; the service transcribes, structures, and stores it.
    /// No partial entry is produced on failure.
    async fn create(&self, audio: &AudioData) -> Result<DiaryEntry, ServiceError>;

    /// One page of entries; `page` is 1-indexed
    async fn list(&self, page: u32, limit: u32) -> Result<DiaryPage, ServiceError>;

    /// Fetch one entry by id
    async fn get(&self, id: &str) -> Result<DiaryEntry, ServiceError>;

    /// Delete one entry by id
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    /// Full-text search
    async fn search(&self, query: &str) -> Result<SearchResults, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_404_service_error() {
        let err = ServiceError::Service {
            status: 404,
            detail: "Diary not found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!ServiceError::Network("down".into()).is_not_found());
    }

    #[test]
    fn detail_ignores_blank_messages() {
        let blank = ServiceError::Service {
            status: 500,
            detail: "  ".to_string(),
        };
        let real = ServiceError::Service {
            status: 422,
            detail: "No speech detected in audio".to_string(),
        };
        assert_eq!(blank.detail(), None);
        assert_eq!(real.detail(), Some("No speech detected in audio"));
        assert_eq!(real.to_string(), "No speech detected in audio");
    }
}
