//! Oracle contracts the scheduling pass consults per queue entry.
//!
//! Both oracles are queries against state the caller already holds under
//! the pass guard; they are expected to be safe to call while that lock
//! is held and not to block indefinitely. Neither commits anything.

use steward_state::{Job, JobId, NodeMask, NodeTable, PartitionTable};

/// The (minimum, maximum, requested) node-count triple for one
/// feasibility test, after clamping to the job's and partition's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeWindow {
    pub min: u32,
    pub max: u32,
    pub requested: u32,
}

/// How a placement test is asked to behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// "Would this start now" — never commits an allocation. The builtin
    /// pass only ever asks this.
    #[default]
    Evaluate,
    /// Evaluate and commit the allocation.
    Commit,
}

/// Answer from a placement test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The job could start now on the returned node set.
    Feasible(NodeMask),
    Infeasible,
}

/// Answers what capacity remains once advance reservations are honored.
pub trait ReservationOracle: Send + Sync {
    /// Availability bitmap for `job` at time `now` (unix seconds), with
    /// capacity held by reservations the job cannot use excluded. `None`
    /// means no feasible window exists. Pure query; reservation state is
    /// never modified.
    fn available_nodes(
        &self,
        job: &Job,
        partitions: &PartitionTable,
        nodes: &NodeTable,
        now: u64,
    ) -> Option<NodeMask>;
}

/// Answers whether (and where) a job could run on given availability.
pub trait PlacementOracle: Send + Sync {
    /// Test `job` against the availability bitmap and node-count window.
    /// In [`PlacementMode::Evaluate`] this is a pure query. The bitmap is
    /// single-use: the caller discards it after this call either way.
    fn test_placement(
        &self,
        job: &Job,
        avail: &NodeMask,
        window: NodeWindow,
        mode: PlacementMode,
        preempt_candidates: Option<&[JobId]>,
    ) -> PlacementOutcome;
}
