//! steward-state — shared cluster state for the steward workload manager.
//!
//! Holds the authoritative in-memory tables every subsystem reads and
//! writes: cluster configuration, partitions, jobs, and nodes. Access is
//! mediated by [`ClusterState`], the single lock coordinator — callers
//! acquire all four resource groups together at the access level they
//! need and release them together.
//!
//! # Architecture
//!
//! ```text
//! ClusterState
//!   ├── config     (ClusterConfig, read-mostly)
//!   ├── partitions (PartitionTable)
//!   ├── jobs       (JobTable, keyed by JobId)
//!   └── nodes      (NodeTable, indexed, backs NodeMask bitmaps)
//! ```

pub mod error;
pub mod mask;
pub mod state;
pub mod types;

pub use error::{StateError, StateResult};
pub use mask::NodeMask;
pub use state::{ClusterState, ReadGuard, SchedGuard};
pub use types::{
    ClusterConfig, Job, JobId, JobState, JobSubmission, JobTable, Node, NodeTable, Partition,
    PartitionId, PartitionTable,
};
