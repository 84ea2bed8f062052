//! End-to-end batch runs against a mock provider

use crate::common::{
    ai_mode_response, create_session, create_test_config, keyword_body, organic_response,
    RecordingProgress, AI_MODE_PATH, ORGANIC_PATH,
};
use serp_harvest::output::{write_batch_outputs, SilentProgress};
use serp_harvest::pipeline::run_batch;
use serp_harvest::ResultType;
use std::future::pending;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keywords(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

async fn mount_organic(server: &MockServer, keyword: &str) {
    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .and(body_string_contains(keyword_body(keyword)))
        .respond_with(ResponseTemplate::new(200).set_body_json(organic_response(keyword)))
        .mount(server)
        .await;
}

async fn mount_ai_mode(server: &MockServer, keyword: &str) {
    Mock::given(method("POST"))
        .and(path(AI_MODE_PATH))
        .and(body_string_contains(keyword_body(keyword)))
        .respond_with(ResponseTemplate::new(200).set_body_json(ai_mode_response(keyword)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_batch_all_keywords_succeed() {
    let mock_server = MockServer::start().await;
    for keyword in ["a", "b"] {
        mount_organic(&mock_server, keyword).await;
        mount_ai_mode(&mock_server, keyword).await;
    }

    let session = create_session(&create_test_config(&mock_server.uri()));
    let result = run_batch(session, keywords(&["a", "b"]), &SilentProgress, pending()).await;

    assert!(!result.interrupted);
    assert_eq!(result.stats.total, 2);
    assert_eq!(result.stats.completed, 2);
    assert_eq!(result.stats.failed, 0);
    assert_eq!(result.stats.organic_rows, 2);
    assert_eq!(result.stats.ai_overview_rows, 4);
    // One summary plus two citations per keyword
    assert_eq!(result.stats.ai_mode_rows, 6);
    assert_eq!(result.rows.len(), 12);

    // Rows of each keyword stay grouped: AI overview, organic, AI mode
    let a_types: Vec<_> = result
        .rows
        .iter()
        .filter(|row| row.keyword == "a")
        .map(|row| row.result_type)
        .collect();
    assert_eq!(
        a_types,
        vec![
            ResultType::AiOverview,
            ResultType::AiOverview,
            ResultType::Organic,
            ResultType::AiMode,
            ResultType::AiMode,
            ResultType::AiMode,
        ]
    );

    // Write the batch out and read the CSV back
    let dir = TempDir::new().unwrap();
    let paths = write_batch_outputs(dir.path(), result.started_at, &result.rows).unwrap();

    let mut reader = csv::Reader::from_path(&paths.csv).unwrap();
    let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 12);

    let organic: Vec<_> = records.iter().filter(|r| &r[0] == "organic").collect();
    assert_eq!(organic.len(), 2);
    assert!(organic.iter().all(|r| &r[2] == "c.example" && &r[4] == "1"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn test_failed_keyword_does_not_stop_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .and(body_string_contains(keyword_body("a")))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    // AI mode is never attempted for a keyword whose primary fetch failed
    Mock::given(method("POST"))
        .and(path(AI_MODE_PATH))
        .and(body_string_contains(keyword_body("a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ai_mode_response("a")))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_organic(&mock_server, "b").await;
    mount_ai_mode(&mock_server, "b").await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let result = run_batch(session, keywords(&["a", "b"]), &SilentProgress, pending()).await;

    assert_eq!(result.stats.completed, 1);
    assert_eq!(result.stats.failed, 1);
    assert!(!result.rows.is_empty());
    assert!(result.rows.iter().all(|row| row.keyword == "b"));
}

#[tokio::test]
async fn test_primary_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(AI_MODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ai_mode_response("a")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let result = run_batch(session, keywords(&["a"]), &SilentProgress, pending()).await;

    assert_eq!(result.stats.failed, 1);
    assert_eq!(result.stats.completed, 0);
    assert!(result.rows.is_empty());
}

#[tokio::test]
async fn test_ai_mode_disabled() {
    let mock_server = MockServer::start().await;
    mount_organic(&mock_server, "a").await;

    Mock::given(method("POST"))
        .and(path(AI_MODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ai_mode_response("a")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.api.ai_mode = false;

    let session = create_session(&config);
    let result = run_batch(session, keywords(&["a"]), &SilentProgress, pending()).await;

    assert_eq!(result.stats.completed, 1);
    assert_eq!(result.stats.ai_mode_rows, 0);
    assert!(result
        .rows
        .iter()
        .all(|row| row.result_type != ResultType::AiMode));
}

#[tokio::test]
async fn test_ai_mode_failure_keeps_keyword() {
    let mock_server = MockServer::start().await;
    mount_organic(&mock_server, "a").await;

    Mock::given(method("POST"))
        .and(path(AI_MODE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let result = run_batch(session, keywords(&["a"]), &SilentProgress, pending()).await;

    assert_eq!(result.stats.completed, 1);
    assert_eq!(result.stats.failed, 0);
    assert_eq!(result.stats.ai_mode_failures, 1);
    assert_eq!(result.stats.organic_rows, 1);
    assert_eq!(result.stats.ai_overview_rows, 2);
    assert_eq!(result.rows.len(), 3);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(organic_response("slow"))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(12)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetch.max_concurrent_requests = 3;
    config.api.ai_mode = false;

    let list: Vec<String> = (0..12).map(|i| format!("kw{}", i)).collect();
    let session = create_session(&config);
    let result = run_batch(session, list, &SilentProgress, pending()).await;

    assert_eq!(result.stats.completed, 12);
    assert!(result.peak_in_flight <= 3);
    assert!(result.peak_in_flight >= 1);
}

#[tokio::test]
async fn test_progress_reported_per_keyword() {
    let mock_server = MockServer::start().await;
    for keyword in ["a", "b", "c"] {
        mount_organic(&mock_server, keyword).await;
    }

    let mut config = create_test_config(&mock_server.uri());
    config.api.ai_mode = false;

    let reporter = RecordingProgress::default();
    let session = create_session(&config);
    let result = run_batch(session, keywords(&["a", "b", "c"]), &reporter, pending()).await;

    assert_eq!(result.stats.completed, 3);
    assert_eq!(*reporter.processed.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(reporter.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shutdown_returns_partial_results() {
    let mock_server = MockServer::start().await;
    mount_organic(&mock_server, "fast").await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .and(body_string_contains(keyword_body("slow")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(organic_response("slow"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.api.ai_mode = false;

    let session = create_session(&config);
    let shutdown = tokio::time::sleep(Duration::from_millis(500));
    let result = run_batch(session, keywords(&["fast", "slow"]), &SilentProgress, shutdown).await;

    assert!(result.interrupted);
    assert!(result.elapsed < Duration::from_secs(5));
    assert_eq!(result.stats.completed, 1);
    assert_eq!(result.stats.failed, 1);
    assert!(!result.rows.is_empty());
    assert!(result.rows.iter().all(|row| row.keyword == "fast"));
}

#[tokio::test]
async fn test_empty_batch() {
    let mock_server = MockServer::start().await;
    let session = create_session(&create_test_config(&mock_server.uri()));

    let result = run_batch(session, Vec::new(), &SilentProgress, pending()).await;

    assert!(!result.interrupted);
    assert_eq!(result.stats.total, 0);
    assert!(result.rows.is_empty());
}
