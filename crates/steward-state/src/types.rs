//! Domain types for the steward cluster state.
//!
//! Jobs, partitions, nodes, and the cluster-wide configuration record.
//! All types are serializable so the host can snapshot or ship them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::mask::NodeMask;

/// Unique identifier for a job.
pub type JobId = u32;

/// Unique identifier for a partition.
pub type PartitionId = String;

/// Jobs keyed by id. Iteration order is ascending id, which keeps queue
/// construction deterministic.
pub type JobTable = BTreeMap<JobId, Job>;

/// Partitions keyed by id.
pub type PartitionTable = HashMap<PartitionId, Partition>;

// ── Job ───────────────────────────────────────────────────────────

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// A job accepted by the manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub state: JobState,
    /// Scheduling priority; higher is served first.
    pub priority: u32,
    /// Minimum acceptable node count (>= 1).
    pub min_nodes: u32,
    /// Maximum acceptable node count; 0 means no explicit maximum.
    pub max_nodes: u32,
    /// The job's default partition — the one the scheduler evaluates it under.
    pub partition: PartitionId,
    /// Further partitions the job is eligible for.
    pub extra_partitions: Vec<PartitionId>,
    /// Unix timestamp (seconds) when the job was submitted.
    pub submitted_at: u64,
    /// Unix timestamp (seconds) when a scheduling pass last evaluated this
    /// job's resources. Deliberately touched whether or not the evaluation
    /// found a fit — other subsystems read it as a last-considered signal.
    pub last_evaluated_at: u64,
}

impl Job {
    /// Whether the job is waiting to be started.
    pub fn is_pending(&self) -> bool {
        self.state == JobState::Pending
    }
}

/// Parameters for submitting a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmission {
    pub name: String,
    pub priority: u32,
    pub min_nodes: u32,
    /// 0 means no explicit maximum.
    pub max_nodes: u32,
    pub partition: PartitionId,
    #[serde(default)]
    pub extra_partitions: Vec<PartitionId>,
}

// ── Partition ─────────────────────────────────────────────────────

/// A named slice of the cluster with its own node-count bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Partition {
    pub id: PartitionId,
    /// Smallest node count a job may request here.
    pub min_nodes: u32,
    /// Largest node count a job may request here.
    pub max_nodes: u32,
    /// Member nodes.
    pub nodes: NodeMask,
    pub up: bool,
}

// ── Node ──────────────────────────────────────────────────────────

/// A compute node. The index is its bit position in every [`NodeMask`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub name: String,
    pub index: usize,
    pub up: bool,
}

/// The cluster's node records, indexed densely so masks stay compact.
#[derive(Debug, Default)]
pub struct NodeTable {
    nodes: Vec<Node>,
    by_name: HashMap<String, usize>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node slots (up or down).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node record, returning its index.
    pub fn push(&mut self, name: &str) -> Option<usize> {
        if self.by_name.contains_key(name) {
            return None;
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            index,
            up: true,
        });
        self.by_name.insert(name.to_string(), index);
        Some(index)
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Mask of nodes currently up.
    pub fn up_mask(&self) -> NodeMask {
        let mut mask = NodeMask::new(self.nodes.len());
        for node in &self.nodes {
            if node.up {
                mask.set(node.index);
            }
        }
        mask
    }
}

// ── Cluster configuration ─────────────────────────────────────────

/// Cluster-wide configuration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    pub cluster_name: String,
    /// Raw scheduling-parameters string, `key=value` comma-separated.
    pub scheduling_parameters: String,
    /// Messaging timeout in seconds; scheduler pass budgets derive from it.
    pub message_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_name: "steward".to_string(),
            scheduling_parameters: String::new(),
            message_timeout_secs: 10,
        }
    }
}
