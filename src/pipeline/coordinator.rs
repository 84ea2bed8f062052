//! Per-keyword orchestration
//!
//! Each keyword runs the primary organic fetch first. The AI mode fetch only
//! happens after the primary fetch succeeded, and its failure never fails the
//! keyword.

use crate::extract::{ai_mode_rows, ai_overview_rows, organic_rows, SerpResponse, SerpRow};
use crate::pipeline::fetcher::{fetch_with_retry, EndpointKind};
use crate::pipeline::session::SerpSession;
use crate::state::KeywordState;
use crate::SerpError;

/// How a keyword ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordOutcome {
    /// Primary fetch succeeded
    Completed {
        organic_rows: usize,
        ai_overview_rows: usize,
        ai_mode_rows: usize,
        /// The AI mode fetch was attempted and failed
        ai_mode_failed: bool,
    },

    /// Primary fetch failed; the keyword contributed no rows
    Failed { reason: String },
}

impl KeywordOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Everything one keyword produced, returned to the scheduler for folding
#[derive(Debug, Clone)]
pub struct KeywordReport {
    pub keyword: String,
    /// AI overview rows, then organic rows, then AI mode rows
    pub rows: Vec<SerpRow>,
    pub outcome: KeywordOutcome,
    pub state: KeywordState,
}

impl KeywordReport {
    /// Report for a keyword whose unit never returned (panic or abort)
    pub fn failed(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            rows: Vec::new(),
            outcome: KeywordOutcome::Failed {
                reason: reason.into(),
            },
            state: KeywordState::Failed,
        }
    }
}

/// Processes a single keyword
///
/// This function:
/// 1. Fetches the organic endpoint
/// 2. Extracts AI overview rows, then organic rows
/// 3. Fetches the AI mode endpoint if enabled and extracts its rows
///
/// # Arguments
///
/// * `session` - Shared per-batch session
/// * `keyword` - The keyword to process
///
/// # Returns
///
/// * `Ok(KeywordReport)` - The keyword finished, successfully or not
/// * `Err(SerpError)` - An illegal state transition was attempted
pub async fn process_keyword(
    session: &SerpSession,
    keyword: &str,
) -> Result<KeywordReport, SerpError> {
    let mut state = KeywordState::PrimaryPending;

    let primary = match fetch_with_retry(session, EndpointKind::Organic, keyword).await {
        Ok(fetched) => fetched,
        Err(failure) => {
            tracing::warn!("Primary fetch failed for {:?}: {}", keyword, failure);
            state = state.transition(KeywordState::Failed)?;
            return Ok(KeywordReport {
                keyword: keyword.to_string(),
                rows: Vec::new(),
                outcome: KeywordOutcome::Failed {
                    reason: failure.to_string(),
                },
                state,
            });
        }
    };

    tracing::debug!(
        keyword,
        attempts = primary.attempts,
        "Primary fetch succeeded"
    );

    let response = SerpResponse::from_value(&primary.body);
    let overview = ai_overview_rows(&response, keyword);
    let organic = organic_rows(&response, keyword);
    let organic_count = organic.len();
    let overview_count = overview.len();

    let mut rows = overview;
    rows.extend(organic);
    state = state.transition(KeywordState::PrimaryDone)?;

    let mut ai_mode_count = 0;
    let mut ai_mode_failed = false;

    if session.ai_mode_enabled() {
        state = state.transition(KeywordState::AiModePending)?;

        match fetch_with_retry(session, EndpointKind::AiMode, keyword).await {
            Ok(fetched) => {
                let response = SerpResponse::from_value(&fetched.body);
                let ai_mode = ai_mode_rows(&response, keyword);
                ai_mode_count = ai_mode.len();
                rows.extend(ai_mode);
            }
            Err(failure) => {
                tracing::warn!("AI mode fetch failed for {:?}: {}", keyword, failure);
                ai_mode_failed = true;
            }
        }
    }

    state = state.transition(KeywordState::Done)?;

    Ok(KeywordReport {
        keyword: keyword.to_string(),
        rows,
        outcome: KeywordOutcome::Completed {
            organic_rows: organic_count,
            ai_overview_rows: overview_count,
            ai_mode_rows: ai_mode_count,
            ai_mode_failed,
        },
        state,
    })
}
