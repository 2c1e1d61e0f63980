use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Timeout for the single `/metrics/cache` request, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl StatsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::timing(
                "stats.request_timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }
}
