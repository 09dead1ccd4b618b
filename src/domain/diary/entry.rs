//! Diary entry records exchanged with the diary service

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Mood;

/// Full diary record. Identifier and creation time are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub transcript: String,
    pub mood: Mood,
    #[serde(default)]
    pub key_events: Vec<String>,
    #[serde(default)]
    pub todos: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    pub created_at: String,
}

impl DiaryEntry {
    /// Collection-view projection of this entry
    pub fn to_list_item(&self) -> DiaryListItem {
        DiaryListItem {
            id: self.id.clone(),
            title: self.title.clone(),
            mood: self.mood.clone(),
            tags: self.tags.clone(),
            duration_sec: self.duration_sec,
            created_at: self.created_at.clone(),
        }
    }

    pub fn duration_secs(&self) -> Option<u64> {
        whole_seconds(self.duration_sec)
    }

    pub fn created_date(&self) -> String {
        display_date(&self.created_at)
    }
}

/// Projection of [`DiaryEntry`] used by list and search views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryListItem {
    pub id: String,
    pub title: String,
    pub mood: Mood,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    pub created_at: String,
}

impl DiaryListItem {
    pub fn duration_secs(&self) -> Option<u64> {
        whole_seconds(self.duration_sec)
    }

    pub fn created_date(&self) -> String {
        display_date(&self.created_at)
    }
}

/// One page of the diary collection, in server order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryPage {
    pub items: Vec<DiaryListItem>,
    pub total: u64,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Search hits for a query, in server order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub items: Vec<DiaryListItem>,
    pub query: String,
    pub total: u64,
}

/// Recorded durations are whole seconds; negative or non-finite values are dropped
fn whole_seconds(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.floor() as u64)
}

/// Calendar date of a service timestamp.
///
/// The service emits either RFC 3339 or SQLite's `YYYY-MM-DD HH:MM:SS`.
/// Anything else is shown as received.
fn display_date(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.date_naive().to_string();
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, fmt) {
            return dt.date().to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return date.to_string();
    }
    timestamp.to_string()
}
