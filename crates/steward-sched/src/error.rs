//! Scheduler agent error types.

use thiserror::Error;

/// Result type alias for scheduler agent operations.
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors that can terminate the scheduler agent.
///
/// Per-entry conditions (infeasible placement, partition mismatch, node
/// bound conflicts) are not errors — they are ordinary pass outcomes and
/// never surface here. What does surface is misconfiguration: the pass
/// interval and job limit are safety bounds on an exclusive-lock
/// operation, and the host must treat a violation as fatal.
#[derive(Debug, Error)]
pub enum SchedError {
    #[error("invalid scheduler pass interval: {0} (must be at least 1 second)")]
    InvalidInterval(i64),

    #[error("invalid scheduler per-pass job limit: {0} (must be at least 1)")]
    InvalidJobLimit(i64),

    #[error("malformed scheduling parameter {key}={value}")]
    MalformedParameter { key: String, value: String },

    #[error("scheduler loop terminated abnormally: {0}")]
    LoopTerminated(String),
}
