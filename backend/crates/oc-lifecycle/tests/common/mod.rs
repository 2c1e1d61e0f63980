#![allow(dead_code)]

use oc_config::Config;
use oc_lifecycle::{
    BinaryResolver, LaunchSpec, LifecycleError, LifecycleResult, Liveness, ProcessHandle,
    ProcessLauncher, ProcessSignals, Publisher, ResolvedBinary, SignalError,
};

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;

pub const FAKE_PID: u32 = 4242;

/// Config with short timings, every path inside `dir`.
pub fn fast_config(dir: &Path, host: &str) -> Config {
    let mut config = Config::default();
    config.sidecar.bucket = "ci-cache".into();
    config.sidecar.host = host.into();
    config.sidecar.version = "v1.0.0".into();
    config.discovery.attempts = 3;
    config.discovery.delay_ms = 10;
    config.health.attempts = 2;
    config.health.delay_ms = 10;
    config.health.request_timeout_ms = 500;
    config.shutdown.poll_interval_ms = 10;
    config.shutdown.timeout_ms = 50;
    config.stats.request_timeout_ms = 500;
    config.paths.log_file = Some(dir.join("omni-cache.log").display().to_string());
    config.paths.state_file = Some(dir.join("state.json").display().to_string());
    config.paths.tool_cache = Some(dir.join("tool-cache").display().to_string());
    config
}

// =========================================================================
// Resolver
// =========================================================================

pub struct FakeResolver {
    outcome: Result<ResolvedBinary, String>,
}

impl FakeResolver {
    pub fn found(path: PathBuf, version: &str) -> Self {
        Self {
            outcome: Ok(ResolvedBinary {
                path,
                version: version.to_string(),
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl BinaryResolver for FakeResolver {
    async fn resolve(&self, _version_spec: &str) -> LifecycleResult<ResolvedBinary> {
        match self.outcome {
            Ok(ref binary) => Ok(binary.clone()),
            Err(ref message) => Err(LifecycleError::resolution(
                "https://releases.invalid/omni-cache",
                message.clone(),
            )),
        }
    }
}

// =========================================================================
// Launcher
// =========================================================================

/// Writes `log_lines` into the log file instead of running anything.
pub struct FakeLauncher {
    log_lines: Vec<String>,
    pub launches: AtomicUsize,
    pub last_spec: Mutex<Option<LaunchSpec>>,
}

impl FakeLauncher {
    pub fn writing(log_lines: &[&str]) -> Self {
        Self {
            log_lines: log_lines.iter().map(|l| l.to_string()).collect(),
            launches: AtomicUsize::new(0),
            last_spec: Mutex::new(None),
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, spec: &LaunchSpec) -> LifecycleResult<ProcessHandle> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        *self.last_spec.lock().unwrap() = Some(spec.clone());

        let mut contents = self.log_lines.join("\n");
        contents.push('\n');
        std::fs::write(&spec.log_file, contents)?;

        Ok(ProcessHandle {
            pid: FAKE_PID,
            log_file: spec.log_file.clone(),
        })
    }
}

// =========================================================================
// Signals
// =========================================================================

pub enum TerminateBehavior {
    Deliver,
    NoSuchProcess,
    Refuse(&'static str),
}

/// Process that stays alive for `alive_probes` liveness checks, then exits.
pub struct FakeSignals {
    terminate: TerminateBehavior,
    alive_probes: Option<u32>,
    pub probes: AtomicU32,
    pub terminates: AtomicUsize,
    pub kills: AtomicUsize,
}

impl FakeSignals {
    pub fn exits_after(alive_probes: u32) -> Self {
        Self::new(TerminateBehavior::Deliver, Some(alive_probes))
    }

    pub fn never_exits() -> Self {
        Self::new(TerminateBehavior::Deliver, None)
    }

    pub fn already_gone() -> Self {
        Self::new(TerminateBehavior::NoSuchProcess, None)
    }

    pub fn refusing(reason: &'static str) -> Self {
        Self::new(TerminateBehavior::Refuse(reason), None)
    }

    fn new(terminate: TerminateBehavior, alive_probes: Option<u32>) -> Self {
        Self {
            terminate,
            alive_probes,
            probes: AtomicU32::new(0),
            terminates: AtomicUsize::new(0),
            kills: AtomicUsize::new(0),
        }
    }

    pub fn kill_count(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }

    pub fn terminate_count(&self) -> usize {
        self.terminates.load(Ordering::SeqCst)
    }
}

impl ProcessSignals for FakeSignals {
    fn terminate(&self, _pid: i32) -> Result<(), SignalError> {
        self.terminates.fetch_add(1, Ordering::SeqCst);
        match self.terminate {
            TerminateBehavior::Deliver => Ok(()),
            TerminateBehavior::NoSuchProcess => Err(SignalError::NoSuchProcess),
            TerminateBehavior::Refuse(reason) => Err(SignalError::Failed(reason.to_string())),
        }
    }

    fn probe_liveness(&self, _pid: i32) -> Liveness {
        let seen = self.probes.fetch_add(1, Ordering::SeqCst);
        match self.alive_probes {
            Some(limit) if seen >= limit => Liveness::Dead,
            _ => Liveness::Alive,
        }
    }

    fn kill(&self, _pid: i32) -> Result<(), SignalError> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =========================================================================
// Publisher
// =========================================================================

#[derive(Default)]
pub struct RecordingPublisher {
    pub outputs: Vec<(String, String)>,
    pub exports: Vec<(String, String)>,
    pub paths: Vec<PathBuf>,
    pub summaries: Vec<String>,
    pub groups: Vec<(String, String)>,
}

impl RecordingPublisher {
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn export(&self, name: &str) -> Option<&str> {
        self.exports
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn group_body(&self, title: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(key, _)| key == title)
            .map(|(_, body)| body.as_str())
    }
}

impl Publisher for RecordingPublisher {
    fn set_output(&mut self, name: &str, value: &str) -> LifecycleResult<()> {
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn export_variable(&mut self, name: &str, value: &str) -> LifecycleResult<()> {
        self.exports.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn add_path(&mut self, dir: &Path) -> LifecycleResult<()> {
        self.paths.push(dir.to_path_buf());
        Ok(())
    }

    fn append_summary(&mut self, markdown: &str) -> LifecycleResult<()> {
        self.summaries.push(markdown.to_string());
        Ok(())
    }

    fn group(&mut self, title: &str, body: &str) {
        self.groups.push((title.to_string(), body.to_string()));
    }
}
