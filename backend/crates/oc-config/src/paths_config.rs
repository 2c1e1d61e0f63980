use crate::{DEFAULT_LOG_FILENAME, DEFAULT_STATE_FILENAME, DEFAULT_TOOL_CACHE_DIRNAME};

use std::path::PathBuf;

use serde::Deserialize;

/// Filesystem locations shared by both phases.
///
/// Unset entries resolve against the runner's scratch directories
/// (`RUNNER_TEMP`, `RUNNER_TOOL_CACHE`) and fall back to the system temp dir.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub log_file: Option<String>,
    pub state_file: Option<String>,
    pub tool_cache: Option<String>,
}

impl PathsConfig {
    /// File the sidecar's stdout and stderr are appended to.
    pub fn log_file_path(&self) -> PathBuf {
        match self.log_file {
            Some(ref path) => PathBuf::from(path),
            None => std::env::temp_dir().join(DEFAULT_LOG_FILENAME),
        }
    }

    /// JSON file bridging state from the start phase to the stop phase.
    pub fn state_file_path(&self) -> PathBuf {
        match self.state_file {
            Some(ref path) => PathBuf::from(path),
            None => Self::runner_dir("RUNNER_TEMP").join(DEFAULT_STATE_FILENAME),
        }
    }

    /// Root of the versioned binary cache.
    pub fn tool_cache_dir(&self) -> PathBuf {
        match self.tool_cache {
            Some(ref path) => PathBuf::from(path),
            None => match std::env::var("RUNNER_TOOL_CACHE") {
                Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
                _ => std::env::temp_dir().join(DEFAULT_TOOL_CACHE_DIRNAME),
            },
        }
    }

    fn runner_dir(var_name: &str) -> PathBuf {
        match std::env::var(var_name) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => std::env::temp_dir(),
        }
    }
}
