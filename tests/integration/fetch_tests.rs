//! Fetch-with-retry behavior against a mock provider

use crate::common::{create_session, create_test_config, organic_response, AUTHORIZATION, ORGANIC_PATH};
use serp_harvest::pipeline::{fetch_with_retry, EndpointKind, FetchFailure};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sends_credentials_and_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .and(header("authorization", AUTHORIZATION))
        .and(header("content-type", "application/json"))
        .and(body_string_contains(r#""depth":20"#))
        .and(body_string_contains(r#""keyword":"running shoes""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(organic_response("running shoes")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let fetched = fetch_with_retry(&session, EndpointKind::Organic, "running shoes")
        .await
        .expect("fetch should succeed");

    assert_eq!(fetched.attempts, 1);
    assert_eq!(fetched.body, organic_response("running shoes"));
    assert_eq!(session.limiter().in_flight(), 0);
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mock_server = MockServer::start().await;

    // First two requests are rate limited
    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(organic_response("a")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let start = Instant::now();
    let fetched = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .expect("fetch should succeed after retries");

    assert_eq!(fetched.attempts, 3);
    // 10ms + 20ms of backoff
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::RateLimited { attempts: 3 }));
    assert!(failure.is_retries_exhausted());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    match failure {
        FetchFailure::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected API failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_invalid_json_fails_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_retried() {
    // Reserve a port, then free it so nothing listens there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let session = create_session(&create_test_config(&format!("http://127.0.0.1:{}", port)));
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::Transport { attempts: 3, .. }));
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ORGANIC_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(organic_response("a"))
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetch.request_timeout_secs = 1;
    config.fetch.max_retries = 2;

    let session = create_session(&config);
    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::Timeout { attempts: 2 }));
}

#[tokio::test]
async fn test_closed_limiter_fails_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(organic_response("a")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = create_session(&create_test_config(&mock_server.uri()));
    session.close();

    let failure = fetch_with_retry(&session, EndpointKind::Organic, "a")
        .await
        .unwrap_err();

    assert!(matches!(failure, FetchFailure::Closed));
}
