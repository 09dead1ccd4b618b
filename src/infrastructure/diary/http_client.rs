//! HTTP diary service adapter

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::ports::{DiaryService, ServiceError};
use crate::domain::audio::AudioData;
use crate::domain::diary::{DiaryEntry, DiaryPage, SearchResults};

/// Multipart field the service reads the recording from
const AUDIO_FIELD: &str = "audio";

const CREATE_FAILED: &str = "Failed to create diary";
const LIST_FAILED: &str = "Failed to load diaries";
const NOT_FOUND: &str = "Diary not found";
const DELETE_FAILED: &str = "Failed to delete diary";
const SEARCH_FAILED: &str = "Search failed";

/// Connection settings for the diary service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Whole-request timeout. Create covers transcription and structuring,
    /// so this needs to be generous.
    pub timeout: StdDuration,
}

/// Error body the service sends on create failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Diary service client over HTTP
pub struct HttpDiaryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDiaryClient {
    pub fn new(config: DiaryClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/diary{}", self.base_url, path)
    }

    fn entry_url(&self, id: &str) -> String {
        self.url(&format!("/{}", urlencoding::encode(id)))
    }

    /// Non-2xx responses become a service error with a fixed message
    fn check_status(response: &Response, generic: &str) -> Result<(), ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        tracing::debug!(%status, url = %response.url(), "diary service returned an error");
        Err(ServiceError::Service {
            status: status.as_u16(),
            detail: generic.to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    /// Create failures carry the service's own `detail` when it sends one
    async fn create_failure(response: Response) -> ServiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = create_failure_detail(status, &body);
        tracing::debug!(%status, %detail, "diary creation rejected");
        ServiceError::Service {
            status: status.as_u16(),
            detail,
        }
    }
}

#[async_trait]
impl DiaryService for HttpDiaryClient {
    async fn create(&self, audio: &AudioData) -> Result<DiaryEntry, ServiceError> {
        let file_part = reqwest::multipart::Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| ServiceError::Network(format!("Failed to build upload: {}", e)))?;
        let form = reqwest::multipart::Form::new().part(AUDIO_FIELD, file_part);

        let url = self.url("/create");
        tracing::debug!(
            %url,
            file_name = %audio.file_name(),
            size = %audio.human_readable_size(),
            "uploading recording"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::create_failure(response).await);
        }

        Self::decode(response).await
    }

    async fn list(&self, page: u32, limit: u32) -> Result<DiaryPage, ServiceError> {
        let response = self
            .client
            .get(self.url("/list"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .map_err(network_error)?;

        Self::check_status(&response, LIST_FAILED)?;
        Self::decode(response).await
    }

    async fn get(&self, id: &str) -> Result<DiaryEntry, ServiceError> {
        let response = self
            .client
            .get(self.entry_url(id))
            .send()
            .await
            .map_err(network_error)?;

        Self::check_status(&response, NOT_FOUND)?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .delete(self.entry_url(id))
            .send()
            .await
            .map_err(network_error)?;

        // The body is ignored
        Self::check_status(&response, DELETE_FAILED)
    }

    async fn search(&self, query: &str) -> Result<SearchResults, ServiceError> {
        let response = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(network_error)?;

        Self::check_status(&response, SEARCH_FAILED)?;
        Self::decode(response).await
    }
}

/// `detail` from a JSON body; otherwise the status reason; otherwise a generic message
fn create_failure_detail(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { detail }) = serde_json::from_str::<ErrorBody>(body) {
        return match detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            _ => CREATE_FAILED.to_string(),
        };
    }

    status
        .canonical_reason()
        .filter(|reason| !reason.is_empty())
        .unwrap_or(CREATE_FAILED)
        .to_string()
}

fn network_error(e: reqwest::Error) -> ServiceError {
    let message = if e.is_connect() {
        "Failed to connect to the diary service".to_string()
    } else if e.is_timeout() {
        "Request to the diary service timed out".to_string()
    } else {
        e.to_string()
    };
    tracing::warn!(error = %e, "diary service request failed");
    ServiceError::Network(message)
}
