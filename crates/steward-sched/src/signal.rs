//! TerminationSignal — cooperative stop for the agent loop.
//!
//! A one-way `running → stopping` flag paired with a wake primitive. The
//! loop sleeps on it between passes; a stop request wakes the sleep
//! immediately, while a reconfigure request deliberately does not (it is
//! a separate flag, observed at the next natural wake — see
//! [`crate::agent`]). There is no transition back: restarting scheduling
//! takes a fresh agent.

use std::time::Duration;

use tokio::sync::watch;

/// Why an interruptible sleep returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// The full interval elapsed with no stop request.
    IntervalElapsed,
    /// A stop was requested; the caller must not start more work.
    StopRequested,
}

/// Stop flag plus wake channel shared between the loop and its handle.
#[derive(Debug)]
pub struct TerminationSignal {
    stop: watch::Sender<bool>,
}

impl TerminationSignal {
    pub fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Self { stop }
    }

    /// Request the loop to stop. Idempotent; callable from any task. A
    /// sleeping loop wakes immediately, a pass in progress finishes its
    /// current bounded work first.
    pub fn request_stop(&self) {
        self.stop.send_replace(true);
    }

    /// Whether a stop has been requested.
    pub fn is_stopping(&self) -> bool {
        *self.stop.borrow()
    }

    /// A receiver for [`sleep_interruptible`] to wait on.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop.subscribe()
    }
}

impl Default for TerminationSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep for `interval`, waking early only on a stop request.
///
/// The two outcomes are distinguishable, and a stop requested before the
/// sleep began returns [`WakeReason::StopRequested`] without waiting —
/// the wakeup cannot be missed.
pub async fn sleep_interruptible(
    stop: &mut watch::Receiver<bool>,
    interval: Duration,
) -> WakeReason {
    if *stop.borrow_and_update() {
        return WakeReason::StopRequested;
    }
    tokio::select! {
        _ = tokio::time::sleep(interval) => WakeReason::IntervalElapsed,
        _ = stop.changed() => WakeReason::StopRequested,
    }
}
