mod config;
mod edge_cases;

use std::env;

use tempfile::TempDir;

/// Every variable `Config::load` reads, cleared so ambient CI settings don't leak in.
const CONFIG_ENV_VARS: &[&str] = &[
    "OC_CONFIG_FILE",
    "OC_SIDECAR_BUCKET",
    "OC_SIDECAR_PREFIX",
    "OC_SIDECAR_HOST",
    "OC_SIDECAR_STORAGE_ENDPOINT",
    "OC_SIDECAR_VERSION",
    "OC_DISCOVERY_ATTEMPTS",
    "OC_DISCOVERY_DELAY_MS",
    "OC_DISCOVERY_MARKER",
    "OC_HEALTH_ATTEMPTS",
    "OC_HEALTH_DELAY_MS",
    "OC_HEALTH_REQUEST_TIMEOUT_MS",
    "OC_SHUTDOWN_POLL_INTERVAL_MS",
    "OC_SHUTDOWN_TIMEOUT_MS",
    "OC_STATS_REQUEST_TIMEOUT_MS",
    "OC_LOG_LEVEL",
    "OC_LOG_COLORED",
    "OC_LOG_FORMAT",
    "OC_PATHS_LOG_FILE",
    "OC_PATHS_STATE_FILE",
    "OC_PATHS_TOOL_CACHE",
    "INPUT_BUCKET",
    "INPUT_PREFIX",
    "INPUT_HOST",
    "INPUT_S3-ENDPOINT",
    "INPUT_VERSION",
];

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Clear every config-related variable for the duration of a test.
pub(crate) fn clean_env() -> Vec<EnvGuard> {
    CONFIG_ENV_VARS
        .iter()
        .map(|&key| EnvGuard::remove(key))
        .collect()
}

/// Write a config file into a fresh temp directory.
pub(crate) fn write_config_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("omni-cache.toml");
    std::fs::write(&path, contents).unwrap();
    (temp, path)
}
