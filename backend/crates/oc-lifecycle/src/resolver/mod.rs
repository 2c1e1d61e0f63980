//! Turning a version specifier into a runnable sidecar binary.

mod platform;
mod release_resolver;

pub use platform::{binary_identifier, map_arch, map_os};
pub use release_resolver::{DEFAULT_RELEASES_URL, ReleaseResolver};

use crate::LifecycleResult;

use std::path::PathBuf;

use async_trait::async_trait;

/// Version alias that always re-resolves.
pub const LATEST: &str = "latest";

pub const TOOL_NAME: &str = "omni-cache";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub path: PathBuf,
    pub version: String,
}

#[async_trait]
pub trait BinaryResolver: Send + Sync {
    /// Local executable plus the concrete version it represents.
    ///
    /// Pinned versions may come from a local cache; `latest` never does.
    async fn resolve(&self, version_spec: &str) -> LifecycleResult<ResolvedBinary>;
}
