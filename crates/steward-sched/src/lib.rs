//! steward-sched — the builtin scheduler agent.
//!
//! A background decision loop that periodically determines which pending
//! jobs could start right now, without disturbing running or reserved
//! work, under strict per-pass budgets. It holds the combined cluster
//! state guard for the duration of each pass, so passes never overlap
//! and nothing else mutates jobs or nodes mid-pass.
//!
//! # Architecture
//!
//! ```text
//! SchedulerAgent (one task)
//!   ├── SchedConfig      (immutable snapshot, reloaded on request)
//!   ├── TerminationSignal (stop flag + interruptible sleep)
//!   └── per iteration: ClusterState::lock_for_sched()
//!         └── run_pass
//!               ├── PendingJobSource::build_queue (priority order)
//!               ├── ReservationOracle  (availability after reservations)
//!               └── PlacementOracle    (would this job start now?)
//! ```
//!
//! The pass commits nothing. Its only mutation is the per-job
//! `last_evaluated_at` heartbeat, stamped for every job the oracles are
//! consulted about.

pub mod agent;
pub mod config;
pub mod error;
pub mod oracle;
pub mod pass;
pub mod queue;
pub mod signal;

pub use agent::{AgentHandle, SchedulerAgent};
pub use config::{ConfigSource, SchedConfig, StaticConfigSource};
pub use error::{SchedError, SchedResult};
pub use oracle::{NodeWindow, PlacementMode, PlacementOracle, PlacementOutcome, ReservationOracle};
pub use pass::{PassEnd, PassLimits, PassSummary, run_pass};
pub use queue::{PendingJobSource, PriorityJobQueue, QueueEntry};
pub use signal::{TerminationSignal, WakeReason, sleep_interruptible};
