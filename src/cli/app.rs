//! Command runners

use std::process::ExitCode;
use std::time::Duration as StdDuration;

use crate::application::ports::{AudioCapture, CaptureError, ConfigStore, DiaryService};
use crate::application::controller::MSG_LIST_FAILED;
use crate::application::{
    AudioCapturer, CaptureSettings, ControllerError, DiaryViewController, ListLoadPolicy,
    ViewCallbacks,
};
use crate::domain::config::AppConfig;
use crate::domain::view::{ViewKind, ViewState};
use crate::infrastructure::{create_capturer, CpalInputDevice, DiaryClientConfig, HttpDiaryClient};

use super::args::Commands;
use super::presenter::Presenter;
use super::signals::{confirm, wait_for_stop, StopSignal};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

const TIMER_REFRESH: StdDuration = StdDuration::from_millis(250);

type CliController = DiaryViewController<AudioCapturer<CpalInputDevice>, HttpDiaryClient>;

/// Effective settings after merging every config source
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub client: DiaryClientConfig,
    pub capture: CaptureSettings,
    pub page_limit: u32,
}

impl ResolvedConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            client: DiaryClientConfig {
                base_url: config.api_url_or_default(),
                timeout: config.request_timeout_or_default().as_std(),
            },
            capture: CaptureSettings {
                max_display: config.max_display_or_default(),
            },
            page_limit: config.page_limit_or_default(),
        }
    }
}

/// Load and merge configuration: defaults < file < env/CLI
///
/// `VOICE_DIARY_API_URL` reaches us through the `--api-url` argument.
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run a diary command (everything except `config`)
pub async fn run_command(command: Commands, config: ResolvedConfig) -> ExitCode {
    tracing::debug!(base_url = %config.client.base_url, "resolved diary service");
    let mut presenter = Presenter::new();

    let code = match command {
        Commands::Record { transcript } => run_record(&config, &mut presenter, transcript).await,
        Commands::List { page, limit } => {
            run_list(&config, &presenter, page, limit.unwrap_or(config.page_limit)).await
        }
        Commands::Show { id, transcript } => run_show(&config, &presenter, &id, transcript).await,
        Commands::Delete { id, yes } => run_delete(&config, &presenter, &id, yes).await,
        Commands::Search { query } => run_search(&config, &presenter, &query).await,
        Commands::Config { .. } => {
            presenter.error("config is handled separately");
            EXIT_USAGE_ERROR
        }
    };

    ExitCode::from(code)
}

fn build_client(config: &ResolvedConfig, presenter: &Presenter) -> Option<HttpDiaryClient> {
    match HttpDiaryClient::new(config.client.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            presenter.error(&e.to_string());
            None
        }
    }
}

fn build_controller(
    config: &ResolvedConfig,
    presenter: &Presenter,
    callbacks: ViewCallbacks,
) -> Option<CliController> {
    let client = build_client(config, presenter)?;
    Some(DiaryViewController::with_callbacks(
        create_capturer(config.capture),
        client,
        config.page_limit,
        callbacks,
    ))
}

/// User-facing text for a capture failure
pub fn capture_failure_message(err: &CaptureError) -> String {
    match err {
        CaptureError::PermissionDenied => {
            "Cannot access the microphone. Check that recording is permitted.".to_string()
        }
        CaptureError::EmptyRecording => "Nothing was recorded".to_string(),
        other => other.to_string(),
    }
}

fn report_controller_error(presenter: &Presenter, err: &ControllerError) {
    match err {
        ControllerError::Capture(e) => presenter.error(&capture_failure_message(e)),
        ControllerError::InvalidIntent(e) => presenter.error(&e.to_string()),
    }
}

async fn run_record(config: &ResolvedConfig, presenter: &mut Presenter, transcript: bool) -> u8 {
    let callbacks = ViewCallbacks {
        on_view_change: Some(Box::new(presenter.processing_observer())),
    };
    let Some(mut controller) = build_controller(config, presenter, callbacks) else {
        return EXIT_ERROR;
    };

    if let Err(e) = controller.start_capture().await {
        report_controller_error(presenter, &e);
        return EXIT_ERROR;
    }

    let max_display = controller.capture().settings().max_display.as_secs();
    presenter.info("Recording. Press Enter to finish, Ctrl+C to discard.");
    presenter.show_recording(max_display);

    let signal = {
        let presenter = &*presenter;
        let capture = controller.capture();
        wait_for_stop(TIMER_REFRESH, || {
            presenter.update_recording(capture.display_elapsed_secs(), max_display)
        })
        .await
    };
    presenter.stop_spinner();

    if signal == StopSignal::Discard {
        controller.abort_capture().await;
        presenter.warn("Recording discarded");
        return EXIT_ERROR;
    }

    if let Err(e) = controller.stop_capture_and_submit().await {
        report_controller_error(presenter, &e);
        return EXIT_ERROR;
    }

    finish_with_detail(&controller, presenter, transcript, "Diary entry saved")
}

/// Print the selected entry if the controller reached the detail view
fn finish_with_detail<C: AudioCapture, S: DiaryService>(
    controller: &DiaryViewController<C, S>,
    presenter: &Presenter,
    transcript: bool,
    success: &str,
) -> u8 {
    match controller.state() {
        ViewState::Detail(entry) => {
            presenter.success(success);
            presenter.diary_detail(entry, transcript);
            EXIT_SUCCESS
        }
        _ => {
            presenter.error(controller.error_message().unwrap_or("Processing failed"));
            EXIT_ERROR
        }
    }
}

async fn run_list(config: &ResolvedConfig, presenter: &Presenter, page: u32, limit: u32) -> u8 {
    let config = ResolvedConfig {
        page_limit: limit,
        ..config.clone()
    };
    let Some(mut controller) = build_controller(&config, presenter, ViewCallbacks::default())
    else {
        return EXIT_ERROR;
    };

    if !controller.load_page(page, ListLoadPolicy::Surface).await {
        presenter.error(controller.error_message().unwrap_or(MSG_LIST_FAILED));
        return EXIT_ERROR;
    }

    presenter.diary_page(controller.diaries(), controller.page(), controller.total());
    EXIT_SUCCESS
}

async fn run_search(config: &ResolvedConfig, presenter: &Presenter, query: &str) -> u8 {
    let Some(client) = build_client(config, presenter) else {
        return EXIT_ERROR;
    };

    match client.search(query).await {
        Ok(results) => {
            presenter.search_results(&results);
            EXIT_SUCCESS
        }
        Err(e) => {
            presenter.error(&e.to_string());
            EXIT_ERROR
        }
    }
}

async fn run_show(config: &ResolvedConfig, presenter: &Presenter, id: &str, transcript: bool) -> u8 {
    let Some(mut controller) = build_controller(config, presenter, ViewCallbacks::default()) else {
        return EXIT_ERROR;
    };

    if let Err(e) = controller.select(id).await {
        report_controller_error(presenter, &e);
        return EXIT_ERROR;
    }

    match controller.state() {
        ViewState::Detail(entry) => {
            presenter.diary_detail(entry, transcript);
            EXIT_SUCCESS
        }
        _ => {
            presenter.error(controller.error_message().unwrap_or("Could not load diary"));
            EXIT_ERROR
        }
    }
}

async fn run_delete(config: &ResolvedConfig, presenter: &Presenter, id: &str, yes: bool) -> u8 {
    let Some(mut controller) = build_controller(config, presenter, ViewCallbacks::default()) else {
        return EXIT_ERROR;
    };

    if let Err(e) = controller.select(id).await {
        report_controller_error(presenter, &e);
        return EXIT_ERROR;
    }

    let title = match controller.selection() {
        Some(entry) => entry.title.clone(),
        None => {
            presenter.error(controller.error_message().unwrap_or("Could not load diary"));
            return EXIT_ERROR;
        }
    };

    if !yes {
        presenter.prompt(&format!("Delete \"{}\"? [y/N]", title));
        if !confirm().await {
            presenter.info("Delete cancelled");
            return EXIT_SUCCESS;
        }
    }

    if let Err(e) = controller.delete(id).await {
        report_controller_error(presenter, &e);
        return EXIT_ERROR;
    }

    if controller.view_kind() == ViewKind::Home {
        presenter.success(&format!("Deleted \"{}\"", title));
        EXIT_SUCCESS
    } else {
        presenter.error(controller.error_message().unwrap_or("Delete failed"));
        EXIT_ERROR
    }
}
