//! Agent execution error types.
//!
//! One taxonomy for the whole run: transport failures are retried by the
//! `Retry` node wrapper, parse/validation failures are retried at the call
//! site with a fresh completion, and unrecognized routing labels are rejected
//! outright instead of looping.

use thiserror::Error;

use crate::plan::ValidationError;

/// Agent execution error.
///
/// Returned by `Node::invoke`, the repair pipeline, and the LLM client.
/// Collaborator failures (a single search query or page fetch) are recovered
/// locally as empty or tagged results and never surface as this type.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Completion service unreachable, timed out, or returned a non-success
    /// status. Retried by the `Retry` wrapper, then fatal.
    #[error("transport error: {0}")]
    Transport(String),

    /// No repair strategy produced a parseable structure. Carries the first
    /// 500 characters of the offending text.
    #[error("no repair strategy succeeded; sample: {sample}")]
    ParseFailure {
        /// Truncated sample of the raw completion text.
        sample: String,
    },

    /// Well-formed output that violates a plan invariant or the thought
    /// schema. Treated like `ParseFailure` for retry purposes.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A routing label that is not a recognized `Action`.
    #[error("unrecognized action {0:?}")]
    UnknownAction(String),

    /// Anything else that stops a step (e.g. a closed semaphore).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl AgentError {
    /// Builds a `ParseFailure` from raw completion text, keeping the first
    /// 500 characters as the diagnostic sample.
    pub fn parse_failure(raw: &str) -> Self {
        AgentError::ParseFailure {
            sample: raw.chars().take(500).collect(),
        }
    }
}
