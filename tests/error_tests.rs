//! Error scenario integration tests

use std::process::Command;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn voice_diary_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-diary"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("VOICE_DIARY_API_URL");
    cmd
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("api_url"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_url() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["config", "set", "api_url", "localhost:8000"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("http"),
        "Expected error about URL scheme, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_page_limit() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["config", "set", "page_limit", "500"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("1 to 100"),
        "Expected error about page limit range, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_duration() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["config", "set", "request_timeout", "forever"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    let first = voice_diary_bin(&home)
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(first.status.success());

    let second = voice_diary_bin(&home)
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already exists"), "got: {}", stderr);
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") && stdout.contains("api_url"),
        "Expected config list output, got: {}",
        stdout
    );
}

#[test]
fn unreachable_service_fails_list() {
    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["list", "--api-url", "http://127.0.0.1:9"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Could not load diaries"),
        "Expected list failure, got: {}",
        stderr
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn show_missing_entry_reports_load_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Diary not found"})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["show", "missing", "--api-url", &server.uri()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Could not load diary"),
        "Expected load failure, got: {}",
        stderr
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d1",
            "title": "Morning run",
            "content": "Ran.",
            "transcript": "ran",
            "mood": "happy",
            "created_at": "2024-03-01 08:30:00"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/diary/d1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = voice_diary_bin(&home)
        .args(["delete", "d1", "-y", "--api-url", &server.uri()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Delete failed"), "got: {}", stderr);
}
