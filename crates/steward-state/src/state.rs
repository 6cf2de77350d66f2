//! ClusterState — the combined lock coordinator over the shared tables.
//!
//! All four resource groups (config, partitions, jobs, nodes) live behind
//! one coordinator. Callers never lock a group on its own: they ask for a
//! combined guard at the access level they need, and every acquisition
//! path takes the group locks in the same fixed order — config,
//! partitions, jobs, nodes. A scheduling pass holds its guard for the
//! pass's whole duration, which is what keeps passes strictly sequential
//! and keeps job/node mutations from interleaving mid-pass.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::mask::NodeMask;
use crate::types::{
    ClusterConfig, Job, JobId, JobState, JobSubmission, JobTable, NodeTable, Partition,
    PartitionTable,
};

/// The shared cluster state tables and their lock coordinator.
pub struct ClusterState {
    config: RwLock<ClusterConfig>,
    partitions: RwLock<PartitionTable>,
    jobs: RwLock<JobTable>,
    nodes: RwLock<NodeTable>,
}

/// Combined guard for a scheduling pass: read access to configuration and
/// partitions, write access to jobs and nodes. Dropping it releases all
/// four groups together.
pub struct SchedGuard<'a> {
    pub config: RwLockReadGuard<'a, ClusterConfig>,
    pub partitions: RwLockReadGuard<'a, PartitionTable>,
    pub jobs: RwLockWriteGuard<'a, JobTable>,
    pub nodes: RwLockWriteGuard<'a, NodeTable>,
}

/// Combined read-only guard over all four resource groups.
pub struct ReadGuard<'a> {
    pub config: RwLockReadGuard<'a, ClusterConfig>,
    pub partitions: RwLockReadGuard<'a, PartitionTable>,
    pub jobs: RwLockReadGuard<'a, JobTable>,
    pub nodes: RwLockReadGuard<'a, NodeTable>,
}

impl ClusterState {
    /// Create an empty cluster with the given configuration record.
    pub fn new(config: ClusterConfig) -> Self {
        info!(cluster = %config.cluster_name, "cluster state initialized");
        Self {
            config: RwLock::new(config),
            partitions: RwLock::new(PartitionTable::new()),
            jobs: RwLock::new(JobTable::new()),
            nodes: RwLock::new(NodeTable::new()),
        }
    }

    /// Acquire the scheduling-pass guard: config/partitions read, jobs/nodes
    /// write. Blocks until every group is granted.
    pub async fn lock_for_sched(&self) -> SchedGuard<'_> {
        SchedGuard {
            config: self.config.read().await,
            partitions: self.partitions.read().await,
            jobs: self.jobs.write().await,
            nodes: self.nodes.write().await,
        }
    }

    /// Acquire read access to all four resource groups.
    pub async fn read(&self) -> ReadGuard<'_> {
        ReadGuard {
            config: self.config.read().await,
            partitions: self.partitions.read().await,
            jobs: self.jobs.read().await,
            nodes: self.nodes.read().await,
        }
    }

    /// Register a node, returning its mask index.
    pub async fn register_node(&self, name: &str) -> StateResult<usize> {
        let _config = self.config.read().await;
        let _partitions = self.partitions.read().await;
        let _jobs = self.jobs.read().await;
        let mut nodes = self.nodes.write().await;
        let index = nodes
            .push(name)
            .ok_or_else(|| StateError::DuplicateNode(name.to_string()))?;
        debug!(node = name, index, "node registered");
        Ok(index)
    }

    /// Create a partition over the named member nodes.
    pub async fn create_partition(
        &self,
        id: &str,
        min_nodes: u32,
        max_nodes: u32,
        members: &[String],
    ) -> StateResult<()> {
        if min_nodes > max_nodes {
            return Err(StateError::InvalidNodeBounds {
                min: min_nodes,
                max: max_nodes,
            });
        }
        let _config = self.config.read().await;
        let mut partitions = self.partitions.write().await;
        let _jobs = self.jobs.read().await;
        let nodes = self.nodes.read().await;

        if partitions.contains_key(id) {
            return Err(StateError::DuplicatePartition(id.to_string()));
        }
        let mut mask = NodeMask::new(nodes.len());
        for name in members {
            let index = nodes
                .index_of(name)
                .ok_or_else(|| StateError::UnknownNode(name.clone()))?;
            mask.set(index);
        }
        partitions.insert(
            id.to_string(),
            Partition {
                id: id.to_string(),
                min_nodes,
                max_nodes,
                nodes: mask,
                up: true,
            },
        );
        info!(partition = id, min_nodes, max_nodes, members = members.len(), "partition created");
        Ok(())
    }

    /// Accept a job into the pending queue, returning its id.
    pub async fn submit_job(&self, submission: JobSubmission) -> StateResult<JobId> {
        if submission.min_nodes == 0 {
            return Err(StateError::ZeroNodeRequest);
        }
        if submission.max_nodes != 0 && submission.min_nodes > submission.max_nodes {
            return Err(StateError::InvalidNodeBounds {
                min: submission.min_nodes,
                max: submission.max_nodes,
            });
        }
        let _config = self.config.read().await;
        let partitions = self.partitions.read().await;
        let mut jobs = self.jobs.write().await;
        let _nodes = self.nodes.read().await;

        if !partitions.contains_key(&submission.partition) {
            return Err(StateError::UnknownPartition(submission.partition));
        }
        for extra in &submission.extra_partitions {
            if !partitions.contains_key(extra) {
                return Err(StateError::UnknownPartition(extra.clone()));
            }
        }

        let id = jobs.keys().next_back().map_or(1, |last| last + 1);
        let job = Job {
            id,
            name: submission.name,
            state: JobState::Pending,
            priority: submission.priority,
            min_nodes: submission.min_nodes,
            max_nodes: submission.max_nodes,
            partition: submission.partition,
            extra_partitions: submission.extra_partitions,
            submitted_at: epoch_secs(),
            last_evaluated_at: 0,
        };
        info!(job = id, name = %job.name, partition = %job.partition, "job submitted");
        jobs.insert(id, job);
        Ok(id)
    }

    /// Fetch a copy of a job record.
    pub async fn job(&self, id: JobId) -> StateResult<Job> {
        let guard = self.read().await;
        guard.jobs.get(&id).cloned().ok_or(StateError::UnknownJob(id))
    }

    /// Number of jobs currently pending.
    pub async fn pending_job_count(&self) -> usize {
        let guard = self.read().await;
        guard.jobs.values().filter(|j| j.is_pending()).count()
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
