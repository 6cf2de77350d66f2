//! SchedulerAgent — the builtin scheduling control loop.
//!
//! One dedicated task: sleep a full interval (interruptible by stop),
//! honor any pending reconfigure, then take the combined state guard and
//! run one scheduling pass. Stop and reconfigure requests arrive
//! asynchronously through [`AgentHandle`] and are observed between work
//! units; a pass in progress always finishes its own bounded work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use steward_state::ClusterState;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::{ConfigSource, SchedConfig};
use crate::error::{SchedError, SchedResult};
use crate::oracle::{PlacementOracle, ReservationOracle};
use crate::pass::{self, PassLimits};
use crate::queue::PendingJobSource;
use crate::signal::{self, TerminationSignal, WakeReason};

/// The builtin scheduler agent. Construct it with its collaborators,
/// then [`start`](Self::start) it; the returned handle is the only way
/// to reach the running loop.
pub struct SchedulerAgent {
    state: Arc<ClusterState>,
    queue: Arc<dyn PendingJobSource>,
    reservations: Arc<dyn ReservationOracle>,
    placement: Arc<dyn PlacementOracle>,
    config_source: Arc<dyn ConfigSource>,
    signal: Arc<TerminationSignal>,
    reconfigure: Arc<AtomicBool>,
}

/// Control handle for a started agent.
pub struct AgentHandle {
    signal: Arc<TerminationSignal>,
    reconfigure: Arc<AtomicBool>,
    task: JoinHandle<SchedResult<()>>,
}

impl SchedulerAgent {
    pub fn new(
        state: Arc<ClusterState>,
        queue: Arc<dyn PendingJobSource>,
        reservations: Arc<dyn ReservationOracle>,
        placement: Arc<dyn PlacementOracle>,
        config_source: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            state,
            queue,
            reservations,
            placement,
            config_source,
            signal: Arc::new(TerminationSignal::new()),
            reconfigure: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Begin the control loop on its own task.
    ///
    /// The first config snapshot is loaded inside the loop before any
    /// iteration; an invalid interval or job limit ends the loop with an
    /// error, which the host must treat as fatal (see
    /// [`AgentHandle::join`]).
    pub fn start(self) -> AgentHandle {
        let signal = self.signal.clone();
        let reconfigure = self.reconfigure.clone();
        let task = tokio::spawn(self.run());
        AgentHandle {
            signal,
            reconfigure,
            task,
        }
    }

    async fn run(self) -> SchedResult<()> {
        let mut config = SchedConfig::load(&*self.config_source)?;
        info!(
            interval_secs = config.pass_interval.as_secs(),
            max_jobs = config.max_jobs_per_pass,
            timeout_secs = config.pass_timeout.as_secs(),
            "scheduler agent started"
        );

        let mut stop_rx = self.signal.subscribe();
        let mut last_pass = Instant::now();

        loop {
            let reason = signal::sleep_interruptible(&mut stop_rx, config.pass_interval).await;
            if reason == WakeReason::StopRequested || self.signal.is_stopping() {
                break;
            }

            if self.reconfigure.swap(false, Ordering::SeqCst) {
                config = SchedConfig::load(&*self.config_source)?;
                info!(
                    interval_secs = config.pass_interval.as_secs(),
                    max_jobs = config.max_jobs_per_pass,
                    timeout_secs = config.pass_timeout.as_secs(),
                    "scheduler configuration reloaded"
                );
            }

            // A reconfigure may have lengthened the interval mid-sleep, and
            // wakes can be spurious; hold off until a full interval has
            // passed since the last completed pass.
            if last_pass.elapsed() < config.pass_interval {
                debug!("interval not yet elapsed, skipping pass");
                continue;
            }

            let now = epoch_secs();
            let mut guard = self.state.lock_for_sched().await;
            let summary = pass::run_pass(
                &mut guard,
                &*self.queue,
                &*self.reservations,
                &*self.placement,
                &PassLimits {
                    max_jobs: config.max_jobs_per_pass,
                    timeout: config.pass_timeout,
                },
                now,
            );
            drop(guard);
            last_pass = Instant::now();

            info!(
                examined = summary.examined,
                feasible = summary.feasible,
                infeasible = summary.infeasible,
                skipped_partition = summary.skipped_partition,
                skipped_bounds = summary.skipped_bounds,
                skipped_reservation = summary.skipped_reservation,
                end = ?summary.end,
                "scheduling pass finished"
            );
        }

        info!("scheduler agent stopped");
        Ok(())
    }
}

impl AgentHandle {
    /// Ask the loop to exit. Idempotent; wakes a sleeping loop at once,
    /// never interrupts a pass in progress.
    pub fn request_stop(&self) {
        self.signal.request_stop();
    }

    /// Ask the loop to reload its tunables at the top of the next
    /// iteration. Idempotent; deliberately does not wake the sleep.
    pub fn request_reconfigure(&self) {
        self.reconfigure.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopping(&self) -> bool {
        self.signal.is_stopping()
    }

    /// A shared handle to the stop signal, for callers that need to
    /// request a stop after `join` has consumed this handle.
    pub fn signal(&self) -> Arc<TerminationSignal> {
        self.signal.clone()
    }

    /// Wait for the loop to exit. `Err` means the agent died of a fatal
    /// misconfiguration (or the loop task itself was torn down); the
    /// host must not keep running without a scheduler.
    pub async fn join(self) -> SchedResult<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(SchedError::LoopTerminated(e.to_string())),
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
