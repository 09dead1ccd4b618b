//! HTTP contract tests for the diary service client

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_diary::application::ports::{DiaryService, ServiceError};
use voice_diary::domain::{AudioData, AudioMimeType, Mood};
use voice_diary::infrastructure::{DiaryClientConfig, HttpDiaryClient};

fn client_for(server: &MockServer) -> HttpDiaryClient {
    HttpDiaryClient::new(DiaryClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn entry_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Morning run",
        "content": "Ran 5k along the river.",
        "transcript": "so this morning I went for a run",
        "mood": "happy",
        "key_events": ["5k run"],
        "todos": ["stretch"],
        "tags": ["health", "running"],
        "audio_path": null,
        "duration_sec": 12.6,
        "created_at": "2024-03-01 08:30:00"
    })
}

#[tokio::test]
async fn create_uploads_audio_field_and_returns_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diary/create"))
        .and(body_string_contains("name=\"audio\""))
        .and(body_string_contains("filename=\"recording.flac\""))
        .and(body_string_contains("audio/flac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json("d1")))
        .expect(1)
        .mount(&server)
        .await;

    let audio = AudioData::new(b"fLaC-test".to_vec(), AudioMimeType::Flac);
    let entry = client_for(&server).create(&audio).await.unwrap();

    assert_eq!(entry.id, "d1");
    assert_eq!(entry.mood, Mood::Happy);
    assert_eq!(entry.duration_secs(), Some(12));
    assert_eq!(entry.tags, vec!["health", "running"]);
}

#[tokio::test]
async fn create_surfaces_service_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diary/create"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "No speech detected in audio"})),
        )
        .mount(&server)
        .await;

    let audio = AudioData::new(vec![1, 2, 3], AudioMimeType::Wav);
    let err = client_for(&server).create(&audio).await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Service {
            status: 422,
            detail: "No speech detected in audio".into()
        }
    );
}

#[tokio::test]
async fn create_non_json_error_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/diary/create"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let audio = AudioData::new(vec![1], AudioMimeType::Flac);
    let err = client_for(&server).create(&audio).await.unwrap_err();

    assert_eq!(err.detail(), Some("Service Unavailable"));
}

#[tokio::test]
async fn list_sends_paging_and_accepts_limit_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/list"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "b", "title": "B", "mood": "sad", "tags": [], "duration_sec": 3.0, "created_at": "2024-03-02 09:00:00"},
                {"id": "a", "title": "A", "mood": "calm", "tags": ["x"], "duration_sec": null, "created_at": "2024-03-01 09:00:00"}
            ],
            "total": 7,
            "page": 2,
            "limit": 5
        })))
        .mount(&server)
        .await;

    let page = client_for(&server).list(2, 5).await.unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, Some(5));
    let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(page.items[1].mood, Mood::Other("calm".into()));
}

#[tokio::test]
async fn empty_list_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0, "page": 1})),
        )
        .mount(&server)
        .await;

    let page = client_for(&server).list(1, 20).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.limit, None);
}

#[tokio::test]
async fn list_failure_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/list"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db locked"})))
        .mount(&server)
        .await;

    let err = client_for(&server).list(1, 20).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load diaries");
}

#[tokio::test]
async fn get_encodes_id_and_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/d%201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json("d 1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diary/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Diary not found"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get("d 1").await.unwrap().id, "d 1");

    let err = client.get("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Diary not found");
}

#[tokio::test]
async fn delete_ignores_body_and_repeated_delete_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/diary/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Diary deleted"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/diary/d1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Diary not found"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete("d1").await.unwrap();

    let err = client.delete("d1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn search_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/search"))
        .and(query_param("q", "coffee & cake"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "a", "title": "Cafe", "mood": "happy", "tags": [], "duration_sec": 5.0, "created_at": "2024-03-01 09:00:00"}],
            "query": "coffee & cake",
            "total": 1
        })))
        .mount(&server)
        .await;

    let results = client_for(&server).search("coffee & cake").await.unwrap();
    assert_eq!(results.total, 1);
    assert_eq!(results.query, "coffee & cake");
    assert_eq!(results.items[0].id, "a");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/diary/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("x").await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Port 9 (discard) is essentially never listening on loopback
    let client = HttpDiaryClient::new(DiaryClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.list(1, 20).await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
}
