use crate::{
    CONFIG_FILE_ENV, ConfigError, ConfigErrorResult, DiscoveryConfig, HealthConfig, LoggingConfig,
    PathsConfig, ShutdownConfig, SidecarConfig, StatsConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sidecar: SidecarConfig,
    pub discovery: DiscoveryConfig,
    pub health: HealthConfig,
    pub shutdown: ShutdownConfig,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

impl Config {
    /// Load config for either phase.
    ///
    /// Loading order:
    /// 1. Explicit `path`, else OC_CONFIG_FILE, else defaults only
    /// 2. Parse the TOML file if one was named (a named file must exist)
    /// 3. Apply OC_* environment variable overrides
    /// 4. Apply INPUT_* action inputs (blank inputs are ignored)
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(path: Option<&Path>) -> ConfigErrorResult<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var(CONFIG_FILE_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        };

        let mut config = match config_path {
            Some(ref p) => Self::load_toml(p)?,
            None => Config::default(),
        };

        config.apply_env_overrides();
        config.apply_action_inputs();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Validate the timing and path settings shared by both phases.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.discovery.validate()?;
        self.health.validate()?;
        self.shutdown.validate()?;
        self.stats.validate()?;
        Ok(())
    }

    /// Validate everything the start phase needs, including required inputs.
    pub fn validate_for_start(&self) -> ConfigErrorResult<()> {
        self.sidecar.validate()?;
        self.validate()
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  sidecar: host={}, version={}, prefix={}, endpoint={}",
            self.sidecar.host,
            self.sidecar.version,
            self.sidecar.prefix.as_deref().unwrap_or("-"),
            self.sidecar.storage_endpoint.as_deref().unwrap_or("-"),
        );
        info!(
            "  discovery: {}x{}ms, marker={:?}",
            self.discovery.attempts, self.discovery.delay_ms, self.discovery.marker
        );
        info!(
            "  health: {}x{}ms (timeout {}ms)",
            self.health.attempts, self.health.delay_ms, self.health.request_timeout_ms
        );
        info!(
            "  shutdown: poll={}ms, timeout={}ms",
            self.shutdown.poll_interval_ms, self.shutdown.timeout_ms
        );
        info!(
            "  logging: {} ({}, colored: {})",
            *self.logging.level, self.logging.format, self.logging.colored
        );
        info!(
            "  paths: log={}, state={}, tool_cache={}",
            self.paths.log_file_path().display(),
            self.paths.state_file_path().display(),
            self.paths.tool_cache_dir().display()
        );
    }

    fn apply_env_overrides(&mut self) {
        // Sidecar
        Self::apply_env_string("OC_SIDECAR_BUCKET", &mut self.sidecar.bucket);
        Self::apply_env_option_string("OC_SIDECAR_PREFIX", &mut self.sidecar.prefix);
        Self::apply_env_string("OC_SIDECAR_HOST", &mut self.sidecar.host);
        Self::apply_env_option_string(
            "OC_SIDECAR_STORAGE_ENDPOINT",
            &mut self.sidecar.storage_endpoint,
        );
        Self::apply_env_string("OC_SIDECAR_VERSION", &mut self.sidecar.version);

        // Discovery
        Self::apply_env_parse("OC_DISCOVERY_ATTEMPTS", &mut self.discovery.attempts);
        Self::apply_env_parse("OC_DISCOVERY_DELAY_MS", &mut self.discovery.delay_ms);
        Self::apply_env_string("OC_DISCOVERY_MARKER", &mut self.discovery.marker);

        // Health
        Self::apply_env_parse("OC_HEALTH_ATTEMPTS", &mut self.health.attempts);
        Self::apply_env_parse("OC_HEALTH_DELAY_MS", &mut self.health.delay_ms);
        Self::apply_env_parse(
            "OC_HEALTH_REQUEST_TIMEOUT_MS",
            &mut self.health.request_timeout_ms,
        );

        // Shutdown
        Self::apply_env_parse(
            "OC_SHUTDOWN_POLL_INTERVAL_MS",
            &mut self.shutdown.poll_interval_ms,
        );
        Self::apply_env_parse("OC_SHUTDOWN_TIMEOUT_MS", &mut self.shutdown.timeout_ms);

        // Stats
        Self::apply_env_parse(
            "OC_STATS_REQUEST_TIMEOUT_MS",
            &mut self.stats.request_timeout_ms,
        );

        // Logging
        Self::apply_env_parse("OC_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("OC_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_parse("OC_LOG_FORMAT", &mut self.logging.format);

        // Paths
        Self::apply_env_option_string("OC_PATHS_LOG_FILE", &mut self.paths.log_file);
        Self::apply_env_option_string("OC_PATHS_STATE_FILE", &mut self.paths.state_file);
        Self::apply_env_option_string("OC_PATHS_TOOL_CACHE", &mut self.paths.tool_cache);
    }

    /// Action inputs arrive as INPUT_<NAME>; an empty value means "not supplied".
    fn apply_action_inputs(&mut self) {
        Self::apply_input_string("INPUT_BUCKET", &mut self.sidecar.bucket);
        Self::apply_input_option("INPUT_PREFIX", &mut self.sidecar.prefix);
        Self::apply_input_string("INPUT_HOST", &mut self.sidecar.host);
        Self::apply_input_option("INPUT_S3-ENDPOINT", &mut self.sidecar.storage_endpoint);
        Self::apply_input_string("INPUT_VERSION", &mut self.sidecar.version);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }

    fn apply_input_string(var_name: &str, target: &mut String) {
        if let Some(val) = Self::input(var_name) {
            *target = val;
        }
    }

    fn apply_input_option(var_name: &str, target: &mut Option<String>) {
        if let Some(val) = Self::input(var_name) {
            *target = Some(val);
        }
    }

    fn input(var_name: &str) -> Option<String> {
        std::env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
