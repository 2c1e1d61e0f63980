//! Readiness polling against the sidecar's `/stats` endpoint.

use crate::{LifecycleError, LifecycleResult, address};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{debug, info};

const HEALTH_PATH: &str = "/stats";

/// Health as seen during one phase. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown,
    Healthy,
    Failed,
}

pub struct HealthChecker {
    client: reqwest::Client,
    url: String,
    state: HealthState,
    attempts_made: u32,
}

impl HealthChecker {
    /// Checker for the sidecar reachable at `target` (`host:port` or URL).
    pub fn new(target: &str, request_timeout: Duration) -> LifecycleResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(1)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}{HEALTH_PATH}", address::http_base(target)),
            state: HealthState::Unknown,
            attempts_made: 0,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    /// One GET; any success status counts, connection errors count as a miss.
    pub async fn probe(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                debug!("Health check returned HTTP {}", resp.status());
                false
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                false
            }
        }
    }

    /// Probe up to `attempts` times, sleeping `delay` between misses.
    ///
    /// Once settled, later calls repeat the first result without probing.
    pub async fn wait_healthy(&mut self, attempts: u32, delay: Duration) -> LifecycleResult<()> {
        match self.state {
            HealthState::Healthy => return Ok(()),
            HealthState::Failed => {
                return Err(LifecycleError::HealthCheckFailed {
                    attempts: self.attempts_made,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            HealthState::Unknown => {}
        }

        for attempt in 1..=attempts {
            self.attempts_made = attempt;
            if self.probe().await {
                info!("omni-cache is healthy after {attempt} attempt(s)");
                self.state = HealthState::Healthy;
                return Ok(());
            }

            debug!("Health check attempt {attempt}/{attempts} failed");

            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }

        self.state = HealthState::Failed;
        Err(LifecycleError::HealthCheckFailed {
            attempts,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
