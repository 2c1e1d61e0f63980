use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Graceful-then-forceful termination of the sidecar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Liveness probe interval after SIGTERM, in milliseconds
    pub poll_interval_ms: u64,
    /// Total wait before escalating to SIGKILL, in milliseconds
    pub timeout_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ShutdownConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::timing(
                "shutdown.poll_interval_ms must be greater than 0",
            ));
        }

        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::timing(format!(
                "shutdown.timeout_ms must be at most {}, got {}",
                MAX_TIMEOUT_MS, self.timeout_ms
            )));
        }

        if self.poll_interval_ms > self.timeout_ms {
            return Err(ConfigError::timing(format!(
                "shutdown.poll_interval_ms ({}) must not exceed shutdown.timeout_ms ({})",
                self.poll_interval_ms, self.timeout_ms
            )));
        }

        Ok(())
    }
}
