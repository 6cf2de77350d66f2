//! Advance-reservation ledger.
//!
//! Reservations set nodes aside for named jobs over a time window. The
//! ledger answers the scheduler's availability query: the job's default
//! partition's up nodes, minus nodes held right now by reservations the
//! job is not admitted to. The query never modifies reservation state.

use std::sync::RwLock;

use steward_sched::ReservationOracle;
use steward_state::{Job, JobId, NodeMask, NodeTable, PartitionTable};
use tracing::{debug, info};

/// A manager-held guarantee that nodes are set aside for specific jobs
/// during a time window.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub name: String,
    pub nodes: NodeMask,
    /// Unix seconds, inclusive.
    pub starts_at: u64,
    /// Unix seconds, exclusive.
    pub ends_at: u64,
    /// Jobs admitted to the reserved nodes.
    pub jobs: Vec<JobId>,
}

impl Reservation {
    fn active_at(&self, now: u64) -> bool {
        self.starts_at <= now && now < self.ends_at
    }

    fn admits(&self, job_id: JobId) -> bool {
        self.jobs.contains(&job_id)
    }
}

/// Builtin reservation oracle.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    reservations: RwLock<Vec<Reservation>>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reservation.
    pub fn add(&self, reservation: Reservation) {
        info!(
            reservation = %reservation.name,
            nodes = reservation.nodes.count(),
            starts_at = reservation.starts_at,
            ends_at = reservation.ends_at,
            "reservation recorded"
        );
        self.reservations
            .write()
            .expect("reservation ledger poisoned")
            .push(reservation);
    }

    pub fn len(&self) -> usize {
        self.reservations
            .read()
            .expect("reservation ledger poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReservationOracle for ReservationLedger {
    fn available_nodes(
        &self,
        job: &Job,
        partitions: &PartitionTable,
        nodes: &NodeTable,
        now: u64,
    ) -> Option<NodeMask> {
        let part = partitions.get(&job.partition)?;
        let mut avail = part.nodes.clone();
        avail.intersect(&nodes.up_mask());

        let reservations = self
            .reservations
            .read()
            .expect("reservation ledger poisoned");
        for resv in reservations.iter() {
            if resv.active_at(now) && !resv.admits(job.id) {
                avail.subtract(&resv.nodes);
            }
        }

        if avail.is_empty() {
            debug!(job = job.id, "no reservation-free window");
            return None;
        }
        Some(avail)
    }
}
