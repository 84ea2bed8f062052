//! State module for tracking per-keyword progress
//!
//! Every keyword moves through a small state machine while it is processed:
//! the primary fetch either fails (terminal) or succeeds, after which the
//! optional AI mode fetch runs before the keyword is done.

mod keyword_state;

pub use keyword_state::KeywordState;
