//! Spawning the sidecar as a detached background process.

use crate::{LifecycleError, LifecycleResult, STATE_LOG, STATE_PID, StateStore};

use std::fs::OpenOptions;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use error_location::ErrorLocation;
use log::info;
use oc_config::SidecarConfig;

pub const ENV_BUCKET: &str = "OMNI_CACHE_BUCKET";
pub const ENV_HOST: &str = "OMNI_CACHE_HOST";
pub const ENV_PREFIX: &str = "OMNI_CACHE_PREFIX";
pub const ENV_S3_ENDPOINT: &str = "OMNI_CACHE_S3_ENDPOINT";

/// Subcommand that runs omni-cache as a sidecar.
pub const SIDECAR_SUBCOMMAND: &str = "sidecar";

/// Variables overlaid on the inherited environment of the sidecar.
///
/// Each field maps to exactly one variable; `None` omits the variable
/// rather than setting it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEnv {
    pub bucket: String,
    pub host: String,
    pub prefix: Option<String>,
    pub s3_endpoint: Option<String>,
}

impl SidecarEnv {
    pub fn from_config(config: &SidecarConfig) -> Self {
        Self {
            bucket: config.bucket.clone(),
            host: config.host.clone(),
            prefix: config.prefix.clone().filter(|p| !p.is_empty()),
            s3_endpoint: config.storage_endpoint.clone().filter(|e| !e.is_empty()),
        }
    }

    pub fn vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (ENV_BUCKET, self.bucket.clone()),
            (ENV_HOST, self.host.clone()),
        ];
        if let Some(ref prefix) = self.prefix {
            vars.push((ENV_PREFIX, prefix.clone()));
        }
        if let Some(ref endpoint) = self.s3_endpoint {
            vars.push((ENV_S3_ENDPOINT, endpoint.clone()));
        }
        vars
    }
}

/// Everything needed to start the sidecar.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: SidecarEnv,
    /// Receives both stdout and stderr, opened in append mode
    pub log_file: PathBuf,
}

/// A spawned sidecar.
///
/// Only meaningful while `pid` has not been recycled by the OS; liveness
/// must be probed again before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub log_file: PathBuf,
}

impl ProcessHandle {
    /// Record pid and log location for the stop phase.
    pub fn persist(&self, store: &mut dyn StateStore) -> LifecycleResult<()> {
        store.save(STATE_PID, &self.pid.to_string())?;
        store.save(STATE_LOG, &self.log_file.display().to_string())?;
        Ok(())
    }
}

pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, spec: &LaunchSpec) -> LifecycleResult<ProcessHandle>;
}

/// Starts the sidecar in its own session so it outlives this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl DetachedLauncher {
    fn open_log(path: &Path) -> LifecycleResult<std::fs::File> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| LifecycleError::LogFile {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LifecycleError::LogFile {
                path: path.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl ProcessLauncher for DetachedLauncher {
    fn launch(&self, spec: &LaunchSpec) -> LifecycleResult<ProcessHandle> {
        let stdout = Self::open_log(&spec.log_file)?;
        let stderr = stdout.try_clone().map_err(|e| LifecycleError::LogFile {
            path: spec.log_file.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.env.vars())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        // New session: no controlling terminal, not in our process group
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        let child = cmd.spawn().map_err(|e| LifecycleError::Spawn {
            program: spec.program.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id();
        info!("Spawned omni-cache with PID {pid}");

        // Never waited on; the sidecar keeps running after we exit
        drop(child);

        Ok(ProcessHandle {
            pid,
            log_file: spec.log_file.clone(),
        })
    }
}
