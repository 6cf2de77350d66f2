//! First-fit node selection.
//!
//! The intentionally simple stock placement policy: a job fits if the
//! availability bitmap holds at least its requested node count, and the
//! would-run set is the lowest available indices. No affinity, no
//! preemption.

use steward_sched::{NodeWindow, PlacementMode, PlacementOracle, PlacementOutcome};
use steward_state::{Job, JobId, NodeMask};
use tracing::debug;

/// Builtin first-fit placement oracle.
#[derive(Debug, Default)]
pub struct FirstFitSelector;

impl FirstFitSelector {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementOracle for FirstFitSelector {
    fn test_placement(
        &self,
        job: &Job,
        avail: &NodeMask,
        window: NodeWindow,
        _mode: PlacementMode,
        _preempt_candidates: Option<&[JobId]>,
    ) -> PlacementOutcome {
        // Nothing here ever commits, so Evaluate and Commit answer alike,
        // and preemption candidates are not considered.
        if window.requested < window.min || window.requested > window.max {
            return PlacementOutcome::Infeasible;
        }
        match avail.first_set(window.requested as usize) {
            Some(nodes) => {
                debug!(
                    job = job.id,
                    requested = window.requested,
                    available = avail.count(),
                    "placement feasible"
                );
                PlacementOutcome::Feasible(nodes)
            }
            None => {
                debug!(
                    job = job.id,
                    requested = window.requested,
                    available = avail.count(),
                    "placement infeasible"
                );
                PlacementOutcome::Infeasible
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_state::JobState;

    fn job(id: JobId) -> Job {
        Job {
            id,
            name: format!("job-{id}"),
            state: JobState::Pending,
            priority: 100,
            min_nodes: 1,
            max_nodes: 0,
            partition: "batch".to_string(),
            extra_partitions: Vec::new(),
            submitted_at: 0,
            last_evaluated_at: 0,
        }
    }

    fn window(min: u32, max: u32, requested: u32) -> NodeWindow {
        NodeWindow { min, max, requested }
    }

    #[test]
    fn picks_lowest_available_indices() {
        let mut avail = NodeMask::new(8);
        for idx in [1, 3, 4, 6] {
            avail.set(idx);
        }
        let outcome = FirstFitSelector::new().test_placement(
            &job(1),
            &avail,
            window(1, 8, 3),
            PlacementMode::Evaluate,
            None,
        );
        let PlacementOutcome::Feasible(nodes) = outcome else {
            panic!("expected feasible");
        };
        assert_eq!(nodes.iter_set().collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn too_few_available_nodes_is_infeasible() {
        let mut avail = NodeMask::new(8);
        avail.set(0);
        avail.set(1);
        let outcome = FirstFitSelector::new().test_placement(
            &job(1),
            &avail,
            window(1, 8, 3),
            PlacementMode::Evaluate,
            None,
        );
        assert_eq!(outcome, PlacementOutcome::Infeasible);
    }

    #[test]
    fn request_outside_window_is_infeasible() {
        let avail = NodeMask::full(8);
        let selector = FirstFitSelector::new();
        assert_eq!(
            selector.test_placement(&job(1), &avail, window(4, 8, 2), PlacementMode::Evaluate, None),
            PlacementOutcome::Infeasible
        );
        assert_eq!(
            selector.test_placement(&job(1), &avail, window(1, 2, 4), PlacementMode::Evaluate, None),
            PlacementOutcome::Infeasible
        );
    }

    #[test]
    fn commit_mode_answers_like_evaluate() {
        let avail = NodeMask::full(4);
        let selector = FirstFitSelector::new();
        let evaluate = selector.test_placement(
            &job(1),
            &avail,
            window(1, 4, 2),
            PlacementMode::Evaluate,
            None,
        );
        let commit = selector.test_placement(
            &job(1),
            &avail,
            window(1, 4, 2),
            PlacementMode::Commit,
            None,
        );
        assert_eq!(evaluate, commit);
    }
}
