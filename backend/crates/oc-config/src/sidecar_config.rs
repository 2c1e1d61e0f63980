use crate::{ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_VERSION};

use serde::Deserialize;

/// What the sidecar is asked to serve, as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    /// Storage bucket backing the cache (required for the start phase)
    pub bucket: String,
    /// Optional key prefix inside the bucket
    pub prefix: Option<String>,
    /// Requested listen address, `host:port` or URL
    pub host: String,
    /// Optional S3-compatible storage endpoint
    pub storage_endpoint: Option<String>,
    /// Release to install, `latest` or a pinned tag such as `v0.7.0`
    pub version: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: None,
            host: String::from(DEFAULT_HOST),
            storage_endpoint: None,
            version: String::from(DEFAULT_VERSION),
        }
    }
}

impl SidecarConfig {
    /// Check the inputs the start phase cannot run without.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::input(
                "Input required and not supplied: bucket",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::input("sidecar.host must not be blank"));
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::input("sidecar.version must not be blank"));
        }

        Ok(())
    }
}
