use crate::{ConfigError, ConfigErrorResult, DEFAULT_STARTUP_MARKER};

use std::time::Duration;

use serde::Deserialize;

// Address discovery constraints
pub const MIN_ATTEMPTS: u32 = 1;
pub const MAX_ATTEMPTS: u32 = 600;
pub const DEFAULT_ATTEMPTS: u32 = 20;

pub const MIN_DELAY_MS: u64 = 10;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_DELAY_MS: u64 = 250;

/// Polling of the sidecar log for the address it actually bound.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Log reads before falling back to the configured host
    pub attempts: u32,
    /// Pause between log reads in milliseconds
    pub delay_ms: u64,
    /// Text the sidecar logs when it starts listening
    pub marker: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
            marker: String::from(DEFAULT_STARTUP_MARKER),
        }
    }
}

impl DiscoveryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.attempts < MIN_ATTEMPTS || self.attempts > MAX_ATTEMPTS {
            return Err(ConfigError::timing(format!(
                "discovery.attempts must be {}-{}, got {}",
                MIN_ATTEMPTS, MAX_ATTEMPTS, self.attempts
            )));
        }

        if self.delay_ms < MIN_DELAY_MS || self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::timing(format!(
                "discovery.delay_ms must be {}-{}, got {}",
                MIN_DELAY_MS, MAX_DELAY_MS, self.delay_ms
            )));
        }

        if self.marker.trim().is_empty() {
            return Err(ConfigError::config("discovery.marker must not be blank"));
        }

        Ok(())
    }
}
