//! SchedConfig — the agent's tunables, loaded as an immutable snapshot.
//!
//! A snapshot is built once at agent start and replaced wholesale on an
//! explicit reconfigure request; it is never partially mutated. The raw
//! values come from a [`ConfigSource`] so the host supplies its live
//! configuration store and tests can inject changing values.

use std::time::Duration;

use crate::error::{SchedError, SchedResult};

/// Pass interval used when the scheduling parameters don't name one.
pub const DEFAULT_PASS_INTERVAL_SECS: u64 = 30;

/// Per-pass job limit used when the scheduling parameters don't name one.
pub const DEFAULT_MAX_JOBS_PER_PASS: u32 = 50;

/// Host-provided accessors for the scheduler's raw configuration.
pub trait ConfigSource: Send + Sync {
    /// Raw scheduling-parameters string, `key=value` comma-separated,
    /// e.g. `"sched_interval=30,max_sched_jobs=50"`.
    fn scheduling_parameters(&self) -> String;

    /// The manager's messaging timeout in seconds. The per-pass time
    /// budget is derived from it.
    fn message_timeout_secs(&self) -> u64;
}

/// A fixed config source over values known up front.
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    pub scheduling_parameters: String,
    pub message_timeout_secs: u64,
}

impl ConfigSource for StaticConfigSource {
    fn scheduling_parameters(&self) -> String {
        self.scheduling_parameters.clone()
    }

    fn message_timeout_secs(&self) -> u64 {
        self.message_timeout_secs
    }
}

/// Immutable snapshot of the agent's tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedConfig {
    /// Wall-clock spacing between scheduling passes.
    pub pass_interval: Duration,
    /// Hard cap on queue entries examined per pass.
    pub max_jobs_per_pass: u32,
    /// Hard wall-clock budget for one pass.
    pub pass_timeout: Duration,
}

impl SchedConfig {
    /// Load a fresh snapshot from the host's configuration.
    ///
    /// Missing keys fall back to defaults. A present-but-invalid value is
    /// an error, never silently ignored: the interval and job limit bound
    /// an exclusive-lock operation and must both be at least 1.
    pub fn load(source: &dyn ConfigSource) -> SchedResult<Self> {
        let params = source.scheduling_parameters();

        let interval = match param_value(&params, "sched_interval") {
            None => DEFAULT_PASS_INTERVAL_SECS as i64,
            Some(raw) => parse_param("sched_interval", &raw)?,
        };
        if interval < 1 {
            return Err(SchedError::InvalidInterval(interval));
        }

        let max_jobs = match param_value(&params, "max_sched_jobs") {
            None => DEFAULT_MAX_JOBS_PER_PASS as i64,
            Some(raw) => parse_param("max_sched_jobs", &raw)?,
        };
        if max_jobs < 1 {
            return Err(SchedError::InvalidJobLimit(max_jobs));
        }

        // Half the messaging timeout, clamped to [1, 10] seconds.
        let timeout = (source.message_timeout_secs() / 2).clamp(1, 10);

        Ok(Self {
            pass_interval: Duration::from_secs(interval as u64),
            max_jobs_per_pass: max_jobs as u32,
            pass_timeout: Duration::from_secs(timeout),
        })
    }
}

/// Extract the value of `key` from a `key=value` comma-separated string.
fn param_value(params: &str, key: &str) -> Option<String> {
    params.split(',').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k.trim() == key).then(|| v.trim().to_string())
    })
}

fn parse_param(key: &str, raw: &str) -> SchedResult<i64> {
    raw.parse::<i64>().map_err(|_| SchedError::MalformedParameter {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(params: &str, timeout: u64) -> StaticConfigSource {
        StaticConfigSource {
            scheduling_parameters: params.to_string(),
            message_timeout_secs: timeout,
        }
    }

    #[test]
    fn defaults_when_keys_missing() {
        let config = SchedConfig::load(&source("", 10)).unwrap();
        assert_eq!(config.pass_interval, Duration::from_secs(30));
        assert_eq!(config.max_jobs_per_pass, 50);
        assert_eq!(config.pass_timeout, Duration::from_secs(5));
    }

    #[test]
    fn keys_override_defaults() {
        let config =
            SchedConfig::load(&source("sched_interval=5, max_sched_jobs=7", 10)).unwrap();
        assert_eq!(config.pass_interval, Duration::from_secs(5));
        assert_eq!(config.max_jobs_per_pass, 7);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let config = SchedConfig::load(&source("defer,batch_size=9", 10)).unwrap();
        assert_eq!(config.pass_interval, Duration::from_secs(30));
        assert_eq!(config.max_jobs_per_pass, 50);
    }

    #[test]
    fn nonpositive_interval_is_fatal() {
        assert!(matches!(
            SchedConfig::load(&source("sched_interval=0", 10)),
            Err(SchedError::InvalidInterval(0))
        ));
        assert!(matches!(
            SchedConfig::load(&source("sched_interval=-3", 10)),
            Err(SchedError::InvalidInterval(-3))
        ));
    }

    #[test]
    fn nonpositive_job_limit_is_fatal() {
        assert!(matches!(
            SchedConfig::load(&source("max_sched_jobs=0", 10)),
            Err(SchedError::InvalidJobLimit(0))
        ));
    }

    #[test]
    fn unparseable_value_is_fatal() {
        assert!(matches!(
            SchedConfig::load(&source("sched_interval=fast", 10)),
            Err(SchedError::MalformedParameter { .. })
        ));
    }

    #[test]
    fn pass_timeout_clamps_to_one_through_ten() {
        assert_eq!(
            SchedConfig::load(&source("", 1)).unwrap().pass_timeout,
            Duration::from_secs(1)
        );
        assert_eq!(
            SchedConfig::load(&source("", 14)).unwrap().pass_timeout,
            Duration::from_secs(7)
        );
        assert_eq!(
            SchedConfig::load(&source("", 120)).unwrap().pass_timeout,
            Duration::from_secs(10)
        );
    }
}
