use crate::resolver::{BinaryResolver, LATEST, ResolvedBinary, TOOL_NAME, binary_identifier};
use crate::{LifecycleError, LifecycleResult};

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::info;

pub const DEFAULT_RELEASES_URL: &str = "https://github.com/cirruslabs/omni-cache/releases";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads release assets into a versioned tool cache.
///
/// Layout: `<tool_cache>/omni-cache/<version>/<binary>`. `latest` is stored
/// as `latest-<YYYY-MM-DD>` but never looked up.
pub struct ReleaseResolver {
    client: reqwest::Client,
    tool_cache: PathBuf,
    releases_url: String,
    binary_name: String,
}

impl ReleaseResolver {
    pub fn new(tool_cache: PathBuf) -> LifecycleResult<Self> {
        Self::with_source(tool_cache, DEFAULT_RELEASES_URL, binary_identifier()?)
    }

    /// Resolver against a custom release server and asset name.
    pub fn with_source(
        tool_cache: PathBuf,
        releases_url: &str,
        binary_name: String,
    ) -> LifecycleResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            tool_cache,
            releases_url: releases_url.trim_end_matches('/').to_string(),
            binary_name,
        })
    }

    pub fn download_url(&self, version: &str) -> String {
        if version == LATEST {
            format!("{}/latest/download/{}", self.releases_url, self.binary_name)
        } else {
            format!(
                "{}/download/{version}/{}",
                self.releases_url, self.binary_name
            )
        }
    }

    fn version_dir(&self, version: &str) -> PathBuf {
        self.tool_cache.join(TOOL_NAME).join(version)
    }

    fn find_cached(&self, version: &str) -> Option<PathBuf> {
        let candidate = self.version_dir(version).join(&self.binary_name);
        candidate.is_file().then_some(candidate)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }

    async fn store(&self, version: &str, bytes: &[u8]) -> LifecycleResult<PathBuf> {
        let dir = self.version_dir(version);
        tokio::fs::create_dir_all(&dir).await?;

        let dest = dir.join(&self.binary_name);
        let partial = dir.join(format!("{}.partial", self.binary_name));
        tokio::fs::write(&partial, bytes).await?;
        make_executable(&partial).await?;
        tokio::fs::rename(&partial, &dest).await?;

        Ok(dest)
    }
}

#[async_trait]
impl BinaryResolver for ReleaseResolver {
    async fn resolve(&self, version_spec: &str) -> LifecycleResult<ResolvedBinary> {
        let version_spec = version_spec.trim();

        if version_spec != LATEST
            && let Some(path) = self.find_cached(version_spec)
        {
            info!("Found cached omni-cache {version_spec} at {}", path.display());
            return Ok(ResolvedBinary {
                path,
                version: version_spec.to_string(),
            });
        }

        let url = self.download_url(version_spec);
        info!("Downloading omni-cache from {url}");

        let bytes = self
            .download(&url)
            .await
            .map_err(|message| LifecycleError::resolution(url.clone(), message))?;

        let resolved_version = if version_spec == LATEST {
            format!("{LATEST}-{}", chrono::Utc::now().format("%Y-%m-%d"))
        } else {
            version_spec.to_string()
        };

        let path = self.store(&resolved_version, &bytes).await?;
        info!("omni-cache installed to {}", path.display());

        Ok(ResolvedBinary {
            path,
            version: resolved_version,
        })
    }
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> LifecycleResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> LifecycleResult<()> {
    Ok(())
}
