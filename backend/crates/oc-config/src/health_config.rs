use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Health polling constraints
pub const MIN_ATTEMPTS: u32 = 1;
pub const MAX_ATTEMPTS: u32 = 600;
pub const DEFAULT_ATTEMPTS: u32 = 10;

pub const MIN_DELAY_MS: u64 = 10;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_DELAY_MS: u64 = 1000;

pub const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Readiness polling against the sidecar's `/stats` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Probes before the start phase gives up
    pub attempts: u32,
    /// Pause between probes in milliseconds
    pub delay_ms: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl HealthConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.attempts < MIN_ATTEMPTS || self.attempts > MAX_ATTEMPTS {
            return Err(ConfigError::timing(format!(
                "health.attempts must be {}-{}, got {}",
                MIN_ATTEMPTS, MAX_ATTEMPTS, self.attempts
            )));
        }

        if self.delay_ms < MIN_DELAY_MS || self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::timing(format!(
                "health.delay_ms must be {}-{}, got {}",
                MIN_DELAY_MS, MAX_DELAY_MS, self.delay_ms
            )));
        }

        if self.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS
            || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::timing(format!(
                "health.request_timeout_ms must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_MS, MAX_REQUEST_TIMEOUT_MS, self.request_timeout_ms
            )));
        }

        Ok(())
    }
}
