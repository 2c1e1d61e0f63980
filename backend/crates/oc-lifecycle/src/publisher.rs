use crate::LifecycleResult;

use std::path::Path;

pub const OUTPUT_VERSION: &str = "version";
pub const OUTPUT_CACHE_ADDRESS: &str = "cache-address";
pub const OUTPUT_CACHE_ENDPOINT: &str = "cache-endpoint";
pub const OUTPUT_CACHE_SOCKET: &str = "cache-socket";

/// Variable exported to later steps with the resolved cache address.
pub const EXPORT_CACHE_ADDRESS: &str = "OMNI_CACHE_ADDRESS";

/// Where each phase publishes results for the calling job.
pub trait Publisher {
    /// Named step output.
    fn set_output(&mut self, name: &str, value: &str) -> LifecycleResult<()>;

    /// Environment variable for every later step of the job.
    fn export_variable(&mut self, name: &str, value: &str) -> LifecycleResult<()>;

    /// Directory prepended to `PATH` for later steps.
    fn add_path(&mut self, dir: &Path) -> LifecycleResult<()>;

    /// Markdown appended to the job-level summary.
    fn append_summary(&mut self, markdown: &str) -> LifecycleResult<()>;

    /// Human-readable block under a collapsible title.
    fn group(&mut self, title: &str, body: &str);
}
