//! Error types for the steward cluster state.

use thiserror::Error;

/// Result type alias for cluster state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while mutating or querying cluster state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("unknown partition: {0}")]
    UnknownPartition(String),

    #[error("partition already exists: {0}")]
    DuplicatePartition(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("node already registered: {0}")]
    DuplicateNode(String),

    #[error("unknown job: {0}")]
    UnknownJob(u32),

    #[error("invalid node bounds: min {min} exceeds max {max}")]
    InvalidNodeBounds { min: u32, max: u32 },

    #[error("job requires at least one node")]
    ZeroNodeRequest,
}
