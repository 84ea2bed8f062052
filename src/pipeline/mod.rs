//! Fetch pipeline for SERP batches
//!
//! This module contains the core batch logic, including:
//! - The shared session with its pooled client and permit pool
//! - HTTP fetching with retry logic
//! - Per-keyword orchestration of the primary and AI mode fetches
//! - Batch scheduling and result folding

mod coordinator;
mod fetcher;
mod limiter;
mod scheduler;
mod session;

pub use coordinator::{process_keyword, KeywordOutcome, KeywordReport};
pub use fetcher::{
    backoff_delay, build_http_client, fetch_with_retry, request_payload, EndpointKind,
    FetchFailure, Fetched,
};
pub use limiter::{InFlightPermit, RequestLimiter};
pub use scheduler::{run_batch, BatchResult};
pub use session::SerpSession;

use crate::config::{Config, Credentials};
use crate::output::ProgressReporter;
use crate::SerpError;
use std::future::Future;
use std::sync::Arc;

/// Runs a complete batch
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the session (client, permit pool, authorization)
/// 2. Process every keyword concurrently
/// 3. Drop the session once all units are done
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `credentials` - API login
/// * `keywords` - Keywords to process
/// * `reporter` - Progress sink
/// * `shutdown` - Resolves when the batch should stop early
///
/// # Returns
///
/// * `Ok(BatchResult)` - Batch ran, possibly interrupted
/// * `Err(SerpError)` - The session could not be built
pub async fn harvest<F>(
    config: &Config,
    credentials: &Credentials,
    keywords: Vec<String>,
    reporter: &dyn ProgressReporter,
    shutdown: F,
) -> Result<BatchResult, SerpError>
where
    F: Future<Output = ()>,
{
    let session = Arc::new(SerpSession::new(config, credentials)?);
    Ok(run_batch(session, keywords, reporter, shutdown).await)
}
