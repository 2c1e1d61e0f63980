mod config;
mod discovery_config;
mod error;
mod health_config;
mod log_level;
mod logging_config;
mod paths_config;
mod shutdown_config;
mod sidecar_config;
mod stats_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use discovery_config::DiscoveryConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use health_config::HealthConfig;
pub use log_level::LogLevel;
pub use logging_config::{LogFormat, LoggingConfig};
pub use paths_config::PathsConfig;
pub use shutdown_config::ShutdownConfig;
pub use sidecar_config::SidecarConfig;
pub use stats_config::StatsConfig;

const DEFAULT_HOST: &str = "localhost:12321";
const DEFAULT_VERSION: &str = "latest";
const DEFAULT_STARTUP_MARKER: &str = "omni-cache started";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_FILENAME: &str = "omni-cache.log";
const DEFAULT_STATE_FILENAME: &str = "omni-cache-state.json";
const DEFAULT_TOOL_CACHE_DIRNAME: &str = "omni-cache-tool-cache";

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "OC_CONFIG_FILE";
