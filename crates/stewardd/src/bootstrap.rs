//! Cluster bootstrap — TOML file parsing and state seeding.
//!
//! The daemon describes a cluster in one TOML file; node and reservation
//! sets are written as host-range expressions and expanded through
//! `steward-hostlist`:
//!
//! ```toml
//! [cluster]
//! name = "tundra"
//! message_timeout_secs = 10
//! scheduling_parameters = "sched_interval=30,max_sched_jobs=50"
//!
//! [nodes]
//! hosts = "n[1-16]"
//!
//! [[partitions]]
//! name = "batch"
//! hosts = "n[1-12]"
//! max_nodes = 12
//!
//! [[jobs]]
//! name = "sim-1"
//! partition = "batch"
//! min_nodes = 2
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use steward_placement::{Reservation, ReservationLedger};
use steward_state::{ClusterConfig, ClusterState, JobSubmission, NodeMask};

#[derive(Debug, Deserialize)]
pub struct ClusterFile {
    pub cluster: ClusterSection,
    pub nodes: NodesSection,
    #[serde(default)]
    pub partitions: Vec<PartitionSection>,
    #[serde(default)]
    pub reservations: Vec<ReservationSection>,
    #[serde(default)]
    pub jobs: Vec<JobSection>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterSection {
    pub name: String,
    #[serde(default = "default_message_timeout")]
    pub message_timeout_secs: u64,
    #[serde(default)]
    pub scheduling_parameters: String,
}

#[derive(Debug, Deserialize)]
pub struct NodesSection {
    /// Host-range expression for every node in the cluster.
    pub hosts: String,
}

#[derive(Debug, Deserialize)]
pub struct PartitionSection {
    pub name: String,
    /// Host-range expression for the partition's members.
    pub hosts: String,
    #[serde(default = "default_one")]
    pub min_nodes: u32,
    pub max_nodes: u32,
}

#[derive(Debug, Deserialize)]
pub struct ReservationSection {
    pub name: String,
    /// Host-range expression for the reserved nodes.
    pub hosts: String,
    /// Seconds from daemon start until the reservation begins.
    #[serde(default)]
    pub starts_in_secs: u64,
    #[serde(default = "default_reservation_secs")]
    pub duration_secs: u64,
    /// Job ids admitted to the reserved nodes.
    #[serde(default)]
    pub jobs: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct JobSection {
    pub name: String,
    pub partition: String,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_one")]
    pub min_nodes: u32,
    /// 0 means no explicit maximum.
    #[serde(default)]
    pub max_nodes: u32,
    #[serde(default)]
    pub extra_partitions: Vec<String>,
}

fn default_message_timeout() -> u64 {
    10
}

fn default_one() -> u32 {
    1
}

fn default_priority() -> u32 {
    100
}

fn default_reservation_secs() -> u64 {
    3600
}

/// Parse a cluster bootstrap file.
pub fn load(path: &Path) -> anyhow::Result<ClusterFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading cluster file {}", path.display()))?;
    let file: ClusterFile =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(file)
}

/// Build and seed the cluster state from a parsed bootstrap file.
pub async fn build_state(file: &ClusterFile) -> anyhow::Result<Arc<ClusterState>> {
    let state = Arc::new(ClusterState::new(ClusterConfig {
        cluster_name: file.cluster.name.clone(),
        scheduling_parameters: file.cluster.scheduling_parameters.clone(),
        message_timeout_secs: file.cluster.message_timeout_secs,
    }));

    let node_names = steward_hostlist::expand(&file.nodes.hosts)
        .with_context(|| format!("expanding node set {}", file.nodes.hosts))?;
    for name in &node_names {
        state.register_node(name).await?;
    }
    info!(nodes = node_names.len(), "nodes registered");

    for part in &file.partitions {
        let members = steward_hostlist::expand(&part.hosts)
            .with_context(|| format!("expanding partition {} members", part.name))?;
        state
            .create_partition(&part.name, part.min_nodes, part.max_nodes, &members)
            .await?;
    }

    for job in &file.jobs {
        state
            .submit_job(JobSubmission {
                name: job.name.clone(),
                priority: job.priority,
                min_nodes: job.min_nodes,
                max_nodes: job.max_nodes,
                partition: job.partition.clone(),
                extra_partitions: job.extra_partitions.clone(),
            })
            .await?;
    }

    Ok(state)
}

/// Build the reservation ledger against the seeded state.
pub async fn build_ledger(
    file: &ClusterFile,
    state: &ClusterState,
) -> anyhow::Result<ReservationLedger> {
    let ledger = ReservationLedger::new();
    if file.reservations.is_empty() {
        return Ok(ledger);
    }

    let now = epoch_secs();
    let guard = state.read().await;
    for resv in &file.reservations {
        let names = steward_hostlist::expand(&resv.hosts)
            .with_context(|| format!("expanding reservation {} nodes", resv.name))?;
        let mut mask = NodeMask::new(guard.nodes.len());
        for name in &names {
            let index = guard
                .nodes
                .index_of(name)
                .with_context(|| format!("reservation {} names unknown node {name}", resv.name))?;
            mask.set(index);
        }
        ledger.add(Reservation {
            name: resv.name.clone(),
            nodes: mask,
            starts_at: now + resv.starts_in_secs,
            ends_at: now + resv.starts_in_secs + resv.duration_secs,
            jobs: resv.jobs.clone(),
        });
    }
    Ok(ledger)
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [cluster]
        name = "tundra"
        scheduling_parameters = "sched_interval=5"

        [nodes]
        hosts = "n[1-4]"

        [[partitions]]
        name = "batch"
        hosts = "n[1-4]"
        max_nodes = 4

        [[reservations]]
        name = "maint"
        hosts = "n[3-4]"
        duration_secs = 600

        [[jobs]]
        name = "sim-1"
        partition = "batch"
        min_nodes = 2
    "#;

    fn parse(toml_text: &str) -> ClusterFile {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn sample_file_parses_with_defaults() {
        let file = parse(SAMPLE);
        assert_eq!(file.cluster.name, "tundra");
        assert_eq!(file.cluster.message_timeout_secs, 10);
        assert_eq!(file.partitions[0].min_nodes, 1);
        assert_eq!(file.jobs[0].priority, 100);
        assert_eq!(file.jobs[0].max_nodes, 0);
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cluster.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let file = load(&path).unwrap();
        assert_eq!(file.nodes.hosts, "n[1-4]");
    }

    #[tokio::test]
    async fn state_is_seeded_from_file() {
        let file = parse(SAMPLE);
        let state = build_state(&file).await.unwrap();
        assert_eq!(state.pending_job_count().await, 1);

        let guard = state.read().await;
        assert_eq!(guard.nodes.len(), 4);
        assert_eq!(guard.partitions.get("batch").unwrap().max_nodes, 4);
        assert_eq!(guard.config.cluster_name, "tundra");
    }

    #[tokio::test]
    async fn ledger_resolves_reserved_hosts() {
        let file = parse(SAMPLE);
        let state = build_state(&file).await.unwrap();
        let ledger = build_ledger(&file, &state).await.unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn unknown_reserved_host_is_an_error() {
        let mut file = parse(SAMPLE);
        file.reservations[0].hosts = "n[7-9]".to_string();
        let state = build_state(&file).await.unwrap();
        assert!(build_ledger(&file, &state).await.is_err());
    }
}
