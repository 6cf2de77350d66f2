//! SchedulingPass — one budget-bounded sweep over the pending queue.
//!
//! Runs under the pass guard, so nothing else mutates jobs or nodes
//! while it works. Entries are evaluated strictly in the order the queue
//! supplied them; the pass stops at the job-count bound or the wall-clock
//! budget, whichever comes first, and leaves unexamined entries pending
//! for the next pass.

use std::time::{Duration, Instant};

use steward_state::SchedGuard;
use tracing::debug;

use crate::oracle::{
    NodeWindow, PlacementMode, PlacementOracle, PlacementOutcome, ReservationOracle,
};
use crate::queue::PendingJobSource;

/// Node-count requests are capped here to keep the arithmetic below from
/// overflowing on partitions configured with "unlimited" bounds.
const MAX_NODE_REQUEST: u32 = 500_000;

/// The two budgets one pass runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassLimits {
    pub max_jobs: u32,
    pub timeout: Duration,
}

/// Why a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEnd {
    /// Every queue entry was considered.
    QueueDrained,
    /// The per-pass job budget was reached; the rest stays pending.
    JobLimitReached,
    /// The wall-clock budget was reached; the rest stays pending.
    TimeBudgetExhausted,
}

/// Counters for one completed pass, for the host's pass-boundary logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Entries that reached a node-bound check or beyond.
    pub examined: u32,
    /// Entries whose placement test answered "would start now".
    pub feasible: u32,
    /// Entries whose placement test answered "would not start".
    pub infeasible: u32,
    /// Entries skipped because the candidate partition was not the job's
    /// default partition.
    pub skipped_partition: u32,
    /// Entries skipped because the clamped minimum exceeded the clamped
    /// maximum node count.
    pub skipped_bounds: u32,
    /// Entries skipped because no reservation-free window exists.
    pub skipped_reservation: u32,
    pub end: PassEnd,
}

impl PassSummary {
    fn new() -> Self {
        Self {
            examined: 0,
            feasible: 0,
            infeasible: 0,
            skipped_partition: 0,
            skipped_bounds: 0,
            skipped_reservation: 0,
            end: PassEnd::QueueDrained,
        }
    }
}

/// Run one scheduling pass under `guard`.
///
/// `now` is the pass start time in unix seconds; every job whose
/// placement is tested gets `last_evaluated_at` stamped to it, feasible
/// or not. Other subsystems read that heartbeat as a last-considered
/// signal, so it is part of this function's contract.
pub fn run_pass(
    guard: &mut SchedGuard<'_>,
    queue: &dyn PendingJobSource,
    reservations: &dyn ReservationOracle,
    placement: &dyn PlacementOracle,
    limits: &PassLimits,
    now: u64,
) -> PassSummary {
    let started = Instant::now();
    let entries = queue.build_queue(&guard.jobs, &guard.partitions);
    let mut summary = PassSummary::new();

    for entry in entries {
        if summary.examined >= limits.max_jobs {
            debug!(limit = limits.max_jobs, "pass reached job budget, breaking out");
            summary.end = PassEnd::JobLimitReached;
            break;
        }

        let Some(job) = guard.jobs.get(&entry.job_id) else {
            continue;
        };
        // Evaluate each job once per pass, under its default partition only.
        if entry.partition_id != job.partition {
            summary.skipped_partition += 1;
            continue;
        }
        let Some(part) = guard.partitions.get(&entry.partition_id) else {
            continue;
        };
        summary.examined += 1;

        // Clamp the request window to job bounds ∩ partition bounds.
        let min_nodes = job.min_nodes.max(part.min_nodes);
        let max_nodes = if job.max_nodes == 0 {
            part.max_nodes
        } else {
            job.max_nodes.min(part.max_nodes)
        };
        let max_nodes = max_nodes.min(MAX_NODE_REQUEST);
        // A job willing to grow is evaluated at its largest acceptable size.
        let req_nodes = if job.max_nodes != 0 { max_nodes } else { min_nodes };

        if min_nodes > max_nodes {
            summary.skipped_bounds += 1;
            continue;
        }

        let Some(avail) =
            reservations.available_nodes(job, &guard.partitions, &guard.nodes, now)
        else {
            summary.skipped_reservation += 1;
            continue;
        };

        let outcome = placement.test_placement(
            job,
            &avail,
            NodeWindow {
                min: min_nodes,
                max: max_nodes,
                requested: req_nodes,
            },
            PlacementMode::Evaluate,
            None,
        );
        // The availability bitmap is single-use; it dies with this entry.
        drop(avail);

        match outcome {
            PlacementOutcome::Feasible(_) => summary.feasible += 1,
            PlacementOutcome::Infeasible => summary.infeasible += 1,
        }

        // Heartbeat: the job was considered this pass, whatever the answer.
        if let Some(job) = guard.jobs.get_mut(&entry.job_id) {
            job.last_evaluated_at = now;
        }

        if started.elapsed() >= limits.timeout {
            debug!(timeout_secs = limits.timeout.as_secs(), "pass reached time budget, breaking out");
            summary.end = PassEnd::TimeBudgetExhausted;
            break;
        }
    }

    summary
}
