/// Keyword state definitions for tracking batch progress
use crate::SerpError;
use std::fmt;

/// Represents the current state of a keyword in the batch
///
/// ```text
/// PrimaryPending ──► Failed
///        │
///        ▼
///   PrimaryDone ──► AiModePending ──► Done
///        │                             ▲
///        └─────────────────────────────┘   (AI mode disabled)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordState {
    // ===== Active States =====
    /// Waiting for (or running) the organic/AI overview fetch
    PrimaryPending,

    /// Primary rows extracted; AI mode not yet decided
    PrimaryDone,

    /// Waiting for (or running) the AI mode fetch
    AiModePending,

    // ===== Terminal States =====
    /// Primary fetch failed; the keyword contributes no rows
    Failed,

    /// Keyword finished, regardless of the AI mode outcome
    Done,
}

impl KeywordState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Done)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: KeywordState) -> bool {
        matches!(
            (self, next),
            (Self::PrimaryPending, Self::Failed)
                | (Self::PrimaryPending, Self::PrimaryDone)
                | (Self::PrimaryDone, Self::AiModePending)
                | (Self::PrimaryDone, Self::Done)
                | (Self::AiModePending, Self::Done)
        )
    }

    /// Moves to `next`, rejecting transitions outside the state graph
    ///
    /// # Returns
    ///
    /// * `Ok(KeywordState)` - The new state
    /// * `Err(SerpError::InvalidTransition)` - `next` is not reachable from here
    pub fn transition(self, next: KeywordState) -> Result<KeywordState, SerpError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SerpError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryPending => "primary_pending",
            Self::PrimaryDone => "primary_done",
            Self::AiModePending => "ai_mode_pending",
            Self::Failed => "failed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for KeywordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
