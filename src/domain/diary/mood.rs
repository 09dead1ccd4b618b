//! Mood tag attached to each diary entry

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mood classification returned by the diary service.
///
/// The service constrains moods to a known set, but the wire value is an open
/// string. Unknown values are kept verbatim so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Sad,
    Anxious,
    Excited,
    Other(String),
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Excited => "excited",
            Self::Other(s) => s,
        }
    }

    /// Display glyph; unknown moods render as neutral
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Anxious => "😰",
            Self::Excited => "🤩",
            Self::Neutral | Self::Other(_) => "😐",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Mood {
    fn from(value: String) -> Self {
        match value.as_str() {
            "happy" => Self::Happy,
            "neutral" => Self::Neutral,
            "sad" => Self::Sad,
            "anxious" => Self::Anxious,
            "excited" => Self::Excited,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Mood {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        match mood {
            Mood::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
