//! View state machine

use std::fmt;
use thiserror::Error;

use crate::domain::diary::DiaryEntry;

/// The single top-level screen currently shown.
///
/// The selected entry lives inside `Detail`, so a selection without a detail
/// view (or a detail view without a selection) cannot be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Home,
    Processing { message: String },
    Detail(DiaryEntry),
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Home => ViewKind::Home,
            Self::Processing { .. } => ViewKind::Processing,
            Self::Detail(_) => ViewKind::Detail,
        }
    }
}

/// Discriminant of [`ViewState`], for reporting and matching without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Home,
    Processing,
    Detail,
}

impl ViewKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Processing => "processing",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an intent is issued in a view that does not accept it
#[derive(Debug, Clone, Error)]
#[error("Invalid intent: cannot {intent} while in {current} view")]
pub struct InvalidIntent {
    pub current: ViewKind,
    pub intent: String,
}

/// User-visible error message, independent of the view state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSurface {
    message: Option<String>,
}

impl ErrorSurface {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.message.is_some()
    }
}

/// View session entity.
///
/// State machine:
///   HOME -> PROCESSING (begin_processing)
///   PROCESSING -> DETAIL (complete_processing)
///   PROCESSING -> HOME (fail_processing)
///   HOME -> DETAIL (open_detail)
///   DETAIL -> HOME (close_detail)
#[derive(Debug, Default)]
pub struct ViewSession {
    state: ViewState,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn kind(&self) -> ViewKind {
        self.state.kind()
    }

    /// The entry shown in the detail view, if any
    pub fn selection(&self) -> Option<&DiaryEntry> {
        match &self.state {
            ViewState::Detail(entry) => Some(entry),
            _ => None,
        }
    }

    fn require(&self, expected: ViewKind, intent: &str) -> Result<(), InvalidIntent> {
        if self.kind() != expected {
            return Err(InvalidIntent {
                current: self.kind(),
                intent: intent.to_string(),
            });
        }
        Ok(())
    }

    /// Transition from HOME to PROCESSING
    pub fn begin_processing(&mut self, message: impl Into<String>) -> Result<(), InvalidIntent> {
        self.require(ViewKind::Home, "submit a recording")?;
        self.state = ViewState::Processing {
            message: message.into(),
        };
        Ok(())
    }

    /// Replace the progress message while PROCESSING
    pub fn update_progress(&mut self, message: impl Into<String>) -> Result<(), InvalidIntent> {
        self.require(ViewKind::Processing, "report progress")?;
        self.state = ViewState::Processing {
            message: message.into(),
        };
        Ok(())
    }

    /// Transition from PROCESSING to DETAIL
    pub fn complete_processing(&mut self, entry: DiaryEntry) -> Result<(), InvalidIntent> {
        self.require(ViewKind::Processing, "complete processing")?;
        self.state = ViewState::Detail(entry);
        Ok(())
    }

    /// Transition from PROCESSING back to HOME
    pub fn fail_processing(&mut self) -> Result<(), InvalidIntent> {
        self.require(ViewKind::Processing, "abandon processing")?;
        self.state = ViewState::Home;
        Ok(())
    }

    /// Transition from HOME to DETAIL
    pub fn open_detail(&mut self, entry: DiaryEntry) -> Result<(), InvalidIntent> {
        self.require(ViewKind::Home, "open an entry")?;
        self.state = ViewState::Detail(entry);
        Ok(())
    }

    /// Transition from DETAIL to HOME, releasing the selection
    pub fn close_detail(&mut self) -> Result<DiaryEntry, InvalidIntent> {
        self.require(ViewKind::Detail, "close the entry")?;
        match std::mem::take(&mut self.state) {
            ViewState::Detail(entry) => Ok(entry),
            other => {
                self.state = other;
                Err(InvalidIntent {
                    current: self.kind(),
                    intent: "close the entry".to_string(),
                })
            }
        }
    }
}
