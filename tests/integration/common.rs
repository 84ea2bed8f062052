//! Shared fixtures for the integration tests

use serde_json::{json, Value};
use serp_harvest::config::{Config, Credentials};
use serp_harvest::output::{ProcessingStats, ProgressReporter};
use serp_harvest::pipeline::SerpSession;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ORGANIC_PATH: &str = "/serp/google/organic/live/advanced";
pub const AI_MODE_PATH: &str = "/serp/google/ai_mode/live/advanced";

/// "user:pass" in Basic-Auth form
pub const AUTHORIZATION: &str = "Basic dXNlcjpwYXNz";

/// Creates a test configuration pointing at the mock server
///
/// Backoff is shortened to 10ms so retry tests stay fast.
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.fetch.max_concurrent_requests = 5;
    config.fetch.request_timeout_secs = 5;
    config.fetch.connect_timeout_secs = 1;
    config.fetch.max_retries = 3;
    config.fetch.retry_delay_base_ms = 10;
    config
}

pub fn create_session(config: &Config) -> Arc<SerpSession> {
    let credentials = Credentials::new("user", "pass");
    Arc::new(SerpSession::new(config, &credentials).expect("session should build"))
}

/// Body fragment identifying the keyword of a request
pub fn keyword_body(keyword: &str) -> String {
    format!(r#""keyword":"{}""#, keyword)
}

/// Organic endpoint response with one AI overview (two citations) and one organic listing
pub fn organic_response(keyword: &str) -> Value {
    json!({
        "status_code": 20000,
        "tasks": [{
            "data": { "keyword": keyword },
            "result": [{
                "keyword": keyword,
                "items": [
                    {
                        "type": "ai_overview",
                        "markdown": "Overview answer",
                        "references": [
                            {
                                "source": "Site A",
                                "domain": "a.example",
                                "url": "https://a.example/",
                                "text": "From A"
                            },
                            {
                                "title": "Site B",
                                "domain": "b.example",
                                "url": "https://b.example/",
                                "text": "From B"
                            }
                        ]
                    },
                    {
                        "type": "organic",
                        "rank_group": 1,
                        "rank_absolute": 2,
                        "domain": "c.example",
                        "url": "https://c.example/",
                        "title": "Result C",
                        "description": "About C"
                    }
                ]
            }]
        }]
    })
}

/// AI mode response with one answer citing two sources
pub fn ai_mode_response(keyword: &str) -> Value {
    json!({
        "tasks": [{
            "data": { "keyword": keyword },
            "result": [{
                "keyword": keyword,
                "items": [{
                    "type": "ai_overview",
                    "markdown": "AI mode answer",
                    "references": [
                        { "source": "Site D", "domain": "d.example", "url": "https://d.example/" },
                        { "source": "Site E", "domain": "e.example", "url": "https://e.example/" }
                    ]
                }]
            }]
        }]
    })
}

/// Progress reporter that remembers every update
#[derive(Default)]
pub struct RecordingProgress {
    pub processed: Mutex<Vec<usize>>,
    pub finished: AtomicUsize,
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, stats: &ProcessingStats) {
        self.processed.lock().unwrap().push(stats.processed());
    }

    fn finish(&self, _stats: &ProcessingStats) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
