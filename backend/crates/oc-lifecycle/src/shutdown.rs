//! Graceful-then-forceful termination of the sidecar.

use crate::{Liveness, ProcessSignals, SignalError};

use std::time::Duration;

use log::{debug, info, warn};
use oc_config::ShutdownConfig;

/// How a shutdown ended. Produced once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The process was gone before SIGTERM reached it
    AlreadyTerminated,
    /// The process exited within the grace period
    GracefulExit,
    /// The grace period ran out and SIGKILL was sent
    ForcedExit,
    /// SIGTERM was rejected for a reason other than a missing process
    SignalRefused { reason: String },
}

pub struct ShutdownCoordinator<'a> {
    signals: &'a dyn ProcessSignals,
    poll_interval: Duration,
    timeout: Duration,
}

impl<'a> ShutdownCoordinator<'a> {
    pub fn new(signals: &'a dyn ProcessSignals, config: &ShutdownConfig) -> Self {
        Self {
            signals,
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
        }
    }

    /// Terminate the process named by `raw_pid`.
    ///
    /// Returns `None` without signalling anything when the pid is missing,
    /// non-numeric or not positive (0 and negatives address process groups).
    pub async fn shutdown(&self, raw_pid: Option<&str>) -> Option<ShutdownOutcome> {
        let Some(pid) = raw_pid.and_then(parse_pid) else {
            warn!("No valid PID found for omni-cache");
            return None;
        };

        info!("Shutting down omni-cache (PID: {pid})...");

        match self.signals.terminate(pid) {
            Ok(()) => {}
            Err(SignalError::NoSuchProcess) => {
                info!("omni-cache process already terminated");
                return Some(ShutdownOutcome::AlreadyTerminated);
            }
            Err(SignalError::Failed(reason)) => {
                warn!("Error shutting down omni-cache: {reason}");
                return Some(ShutdownOutcome::SignalRefused { reason });
            }
        }

        Some(self.await_exit(pid).await)
    }

    async fn await_exit(&self, pid: i32) -> ShutdownOutcome {
        let mut waited = Duration::ZERO;

        while waited < self.timeout {
            if self.signals.probe_liveness(pid) == Liveness::Dead {
                info!("omni-cache shutdown complete");
                return ShutdownOutcome::GracefulExit;
            }
            tokio::time::sleep(self.poll_interval).await;
            waited += self.poll_interval;
        }

        warn!("omni-cache did not respond to SIGTERM, sending SIGKILL");
        if let Err(e) = self.signals.kill(pid) {
            // May have exited between the last probe and now
            debug!("SIGKILL to {pid} failed: {e}");
        }

        ShutdownOutcome::ForcedExit
    }
}

/// Positive pid from stored state.
pub fn parse_pid(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|pid| *pid > 0)
}
