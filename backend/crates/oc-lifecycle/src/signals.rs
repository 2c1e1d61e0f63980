//! Signal delivery and liveness probing for a pid we do not own.
//!
//! Liveness is a zero-signal probe. Pids are recycled by the OS, so on a
//! long-lived host a probe can report a stranger's process as ours. The
//! window is small (one CI job) and is accepted, not eliminated.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("no such process")]
    NoSuchProcess,

    #[error("{0}")]
    Failed(String),
}

pub trait ProcessSignals: Send + Sync {
    /// Ask the process to exit (SIGTERM).
    fn terminate(&self, pid: i32) -> Result<(), SignalError>;

    /// Probe existence without delivering anything (signal 0).
    fn probe_liveness(&self, pid: i32) -> Liveness;

    /// Unconditional kill (SIGKILL).
    fn kill(&self, pid: i32) -> Result<(), SignalError>;
}

/// Real signals via `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSignals;

#[cfg(unix)]
impl SystemSignals {
    fn send(pid: i32, signal: Option<nix::sys::signal::Signal>) -> Result<(), SignalError> {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        match kill(Pid::from_raw(pid), signal) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(SignalError::NoSuchProcess),
            Err(errno) => Err(SignalError::Failed(errno.desc().to_string())),
        }
    }
}

#[cfg(unix)]
impl ProcessSignals for SystemSignals {
    fn terminate(&self, pid: i32) -> Result<(), SignalError> {
        Self::send(pid, Some(nix::sys::signal::Signal::SIGTERM))
    }

    fn probe_liveness(&self, pid: i32) -> Liveness {
        // EPERM still means the process exists
        match Self::send(pid, None) {
            Err(SignalError::NoSuchProcess) => Liveness::Dead,
            _ => Liveness::Alive,
        }
    }

    fn kill(&self, pid: i32) -> Result<(), SignalError> {
        Self::send(pid, Some(nix::sys::signal::Signal::SIGKILL))
    }
}

#[cfg(not(unix))]
impl ProcessSignals for SystemSignals {
    fn terminate(&self, _pid: i32) -> Result<(), SignalError> {
        Err(SignalError::Failed(
            "signals are not supported on this platform".into(),
        ))
    }

    fn probe_liveness(&self, _pid: i32) -> Liveness {
        Liveness::Dead
    }

    fn kill(&self, _pid: i32) -> Result<(), SignalError> {
        Err(SignalError::Failed(
            "signals are not supported on this platform".into(),
        ))
    }
}
