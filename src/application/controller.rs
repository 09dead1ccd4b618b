//! Diary view controller
//!
//! Orchestrates capture, submission, and view transitions. Owns the view
//! state, the error surface, and the list cache; drives an [`AudioCapture`]
//! and a [`DiaryService`]. Service failures are caught here and turned into
//! user-facing messages; only capture failures and rejected intents are
//! returned to the caller.

use thiserror::Error;

use crate::domain::audio::AudioData;
use crate::domain::diary::{DiaryEntry, DiaryListItem};
use crate::domain::view::{ErrorSurface, InvalidIntent, ViewKind, ViewSession, ViewState};

use super::ports::{AudioCapture, CaptureError, DiaryService, ServiceError};

/// Progress message shown while the upload is prepared
pub const MSG_TRANSCRIBING: &str = "Transcribing audio...";
/// Progress message shown while the service structures the entry
pub const MSG_STRUCTURING: &str = "Structuring diary entry...";
/// Fallback when a create failure carries no message
pub const MSG_CREATE_FAILED: &str = "Processing failed";
pub const MSG_LOAD_FAILED: &str = "Could not load diary";
pub const MSG_DELETE_FAILED: &str = "Delete failed";
pub const MSG_LIST_FAILED: &str = "Could not load diaries";

/// What to do when a list refresh fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLoadPolicy {
    /// Keep the cache as it was and show nothing. Used for the cold-start
    /// load and for refreshes that follow a completed create or delete.
    Silent,
    /// Keep the cache as it was and set the error surface.
    Surface,
}

/// Errors returned to the presentation layer
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    InvalidIntent(#[from] InvalidIntent),
}

/// Callbacks for re-rendering
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct ViewCallbacks {
    /// Called after every view transition with the new state
    pub on_view_change: Option<Box<dyn Fn(&ViewState) + Send + Sync>>,
}

/// The capture-to-presentation state machine
pub struct DiaryViewController<C, S>
where
    C: AudioCapture,
    S: DiaryService,
{
    capture: C,
    service: S,
    view: ViewSession,
    error: ErrorSurface,
    diaries: Vec<DiaryListItem>,
    total: u64,
    page: u32,
    page_limit: u32,
    callbacks: ViewCallbacks,
}

impl<C, S> DiaryViewController<C, S>
where
    C: AudioCapture,
    S: DiaryService,
{
    /// Create a controller in the home view with an empty list cache
    pub fn new(capture: C, service: S, page_limit: u32) -> Self {
        Self::with_callbacks(capture, service, page_limit, ViewCallbacks::default())
    }

    pub fn with_callbacks(
        capture: C,
        service: S,
        page_limit: u32,
        callbacks: ViewCallbacks,
    ) -> Self {
        Self {
            capture,
            service,
            view: ViewSession::new(),
            error: ErrorSurface::default(),
            diaries: Vec::new(),
            total: 0,
            page: 1,
            page_limit,
            callbacks,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.view.state()
    }

    pub fn view_kind(&self) -> ViewKind {
        self.view.kind()
    }

    pub fn selection(&self) -> Option<&DiaryEntry> {
        self.view.selection()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.message()
    }

    /// Cached page, in server order
    pub fn diaries(&self) -> &[DiaryListItem] {
        &self.diaries
    }

    /// Server-reported total at the last successful load
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Page number of the cached list
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.capture.elapsed_secs()
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn dismiss_error(&mut self) {
        self.error.clear();
    }

    fn notify(&self) {
        tracing::debug!(view = %self.view.kind(), "view changed");
        if let Some(ref cb) = self.callbacks.on_view_change {
            cb(self.view.state());
        }
    }

    /// Cold-start load. Failures are swallowed: an empty list is an
    /// acceptable initial state.
    pub async fn load_initial(&mut self) {
        self.refresh_list(ListLoadPolicy::Silent).await;
    }

    /// Replace the list cache with page 1 from the service.
    ///
    /// Returns whether the cache was refreshed.
    pub async fn refresh_list(&mut self, policy: ListLoadPolicy) -> bool {
        self.load_page(1, policy).await
    }

    /// Replace the list cache with the given 1-indexed page.
    pub async fn load_page(&mut self, page: u32, policy: ListLoadPolicy) -> bool {
        match self.service.list(page, self.page_limit).await {
            Ok(loaded) => {
                tracing::debug!(
                    page = loaded.page,
                    items = loaded.items.len(),
                    total = loaded.total,
                    "list refreshed"
                );
                self.diaries = loaded.items;
                self.total = loaded.total;
                self.page = loaded.page;
                true
            }
            Err(e) => {
                match policy {
                    ListLoadPolicy::Silent => {
                        tracing::debug!(error = %e, "list refresh failed; keeping cached list");
                    }
                    ListLoadPolicy::Surface => {
                        tracing::warn!(error = %e, "list refresh failed");
                        self.error.set(MSG_LIST_FAILED);
                    }
                }
                false
            }
        }
    }

    /// Begin recording. Capture failures are returned as-is and leave the
    /// view unchanged.
    pub async fn start_capture(&mut self) -> Result<(), ControllerError> {
        self.require_home("start recording")?;
        self.capture.start().await?;
        self.error.clear();
        Ok(())
    }

    /// Drop the current recording without submitting it
    pub async fn abort_capture(&mut self) {
        self.capture.abort().await;
    }

    /// Stop recording and submit the result
    pub async fn stop_capture_and_submit(&mut self) -> Result<(), ControllerError> {
        self.require_home("stop recording")?;
        let captured = self.capture.stop().await?;
        tracing::info!(
            duration_secs = captured.duration_secs,
            size = %captured.audio.human_readable_size(),
            "submitting recording"
        );
        self.submit(captured.audio).await
    }

    /// Submit a recording for transcription and structuring.
    ///
    /// Takes ownership of the blob so it cannot be submitted twice. On
    /// failure the recording is discarded and the list cache is untouched.
    pub async fn submit(&mut self, audio: AudioData) -> Result<(), ControllerError> {
        self.view.begin_processing(MSG_TRANSCRIBING)?;
        self.error.clear();
        self.notify();

        self.view.update_progress(MSG_STRUCTURING)?;
        self.notify();

        let result = self.service.create(&audio).await;
        drop(audio);

        match result {
            Ok(entry) => {
                tracing::info!(id = %entry.id, "diary entry created");
                self.view.complete_processing(entry)?;
                self.notify();
                self.refresh_list(ListLoadPolicy::Silent).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "diary creation failed");
                self.error.set(create_failure_message(&e));
                self.view.fail_processing()?;
                self.notify();
            }
        }
        Ok(())
    }

    /// Open the detail view for an entry
    pub async fn select(&mut self, id: &str) -> Result<(), ControllerError> {
        self.require_home("open an entry")?;
        if self.capture.is_recording() {
            return Err(InvalidIntent {
                current: self.view.kind(),
                intent: "open an entry while recording".to_string(),
            }
            .into());
        }
        self.error.clear();

        match self.service.get(id).await {
            Ok(entry) => {
                self.view.open_detail(entry)?;
                self.notify();
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to load diary entry");
                self.error.set(MSG_LOAD_FAILED);
            }
        }
        Ok(())
    }

    /// Leave the detail view. No network call.
    pub fn close(&mut self) -> Result<(), ControllerError> {
        self.view.close_detail()?;
        self.notify();
        Ok(())
    }

    /// Delete an entry from the detail view. Confirmation is the caller's job.
    ///
    /// On success the view returns home and the list is reloaded; a failed
    /// reload leaves the list stale without undoing the transition. On failure
    /// the detail view and its selection stay as they were.
    pub async fn delete(&mut self, id: &str) -> Result<(), ControllerError> {
        match self.view.selection() {
            Some(entry) if entry.id == id => {}
            Some(_) => {
                return Err(InvalidIntent {
                    current: self.view.kind(),
                    intent: format!("delete entry {} while another is open", id),
                }
                .into());
            }
            None => {
                return Err(InvalidIntent {
                    current: self.view.kind(),
                    intent: "delete an entry".to_string(),
                }
                .into());
            }
        }
        self.error.clear();

        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "diary entry deleted");
                self.view.close_detail()?;
                self.notify();
                self.refresh_list(ListLoadPolicy::Silent).await;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to delete diary entry");
                self.error.set(MSG_DELETE_FAILED);
            }
        }
        Ok(())
    }

    fn require_home(&self, intent: &str) -> Result<(), InvalidIntent> {
        if self.view.kind() != ViewKind::Home {
            return Err(InvalidIntent {
                current: self.view.kind(),
                intent: intent.to_string(),
            });
        }
        Ok(())
    }
}

/// User-facing message for a failed create
fn create_failure_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Service { .. } => err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| MSG_CREATE_FAILED.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_failure_prefers_service_detail() {
        let err = ServiceError::Service {
            status: 422,
            detail: "No speech detected in audio".to_string(),
        };
        assert_eq!(create_failure_message(&err), "No speech detected in audio");
    }

    #[test]
    fn create_failure_falls_back_to_generic() {
        let err = ServiceError::Service {
            status: 500,
            detail: String::new(),
        };
        assert_eq!(create_failure_message(&err), MSG_CREATE_FAILED);
    }

    #[test]
    fn create_failure_reports_transport_errors() {
        let err = ServiceError::Network("connection refused".to_string());
        assert!(create_failure_message(&err).contains("connection refused"));
    }
}
