//! The pending-job queue contract and the builtin priority ordering.
//!
//! A queue is rebuilt for every pass and consumed front-to-back once;
//! entries are ephemeral and owned by the pass. The pass treats the
//! supplied order as authoritative and never re-sorts.

use std::cmp::Reverse;

use steward_state::{JobId, JobTable, PartitionId, PartitionTable};
use tracing::debug;

/// One (job, candidate partition) pair, valid for a single pass.
///
/// A job eligible under several partitions appears once per partition;
/// the pass evaluates it only under its default partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub job_id: JobId,
    pub partition_id: PartitionId,
}

/// Yields the priority-ordered pending queue for one pass.
pub trait PendingJobSource: Send + Sync {
    /// Build the queue from the tables the pass holds under its guard.
    /// The returned order is authoritative.
    fn build_queue(&self, jobs: &JobTable, partitions: &PartitionTable) -> Vec<QueueEntry>;
}

/// Builtin ranking: priority descending, ties broken by job id ascending,
/// a job's default partition ahead of its extras. Deterministic so pass
/// decisions are auditable.
#[derive(Debug, Default)]
pub struct PriorityJobQueue;

impl PriorityJobQueue {
    pub fn new() -> Self {
        Self
    }
}

impl PendingJobSource for PriorityJobQueue {
    fn build_queue(&self, jobs: &JobTable, partitions: &PartitionTable) -> Vec<QueueEntry> {
        let mut entries = Vec::new();
        for job in jobs.values().filter(|j| j.is_pending()) {
            for partition_id in
                std::iter::once(&job.partition).chain(job.extra_partitions.iter())
            {
                if partitions.contains_key(partition_id) {
                    entries.push((
                        job.priority,
                        QueueEntry {
                            job_id: job.id,
                            partition_id: partition_id.clone(),
                        },
                    ));
                }
            }
        }
        // Stable sort keeps a job's default partition ahead of its extras.
        entries.sort_by_key(|(priority, entry)| (Reverse(*priority), entry.job_id));
        debug!(entries = entries.len(), "pending queue built");
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}
