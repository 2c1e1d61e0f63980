//! Lifecycle coordination for the omni-cache sidecar.
//!
//! The start phase resolves a binary, spawns it detached, discovers the
//! address it listens on, waits for it to answer and publishes the result.
//! The stop phase reads the state the start phase left behind, reports
//! cache statistics and shuts the process down.

pub mod address;
pub mod error;
pub mod health;
pub mod launch;
pub mod log_reader;
pub mod publisher;
pub mod resolver;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state_store;
pub mod stats;
pub mod stop;

#[cfg(test)]
mod tests;

pub use error::{LifecycleError, Result as LifecycleResult};
pub use health::{HealthChecker, HealthState};
pub use launch::{
    DetachedLauncher, ENV_BUCKET, ENV_HOST, ENV_PREFIX, ENV_S3_ENDPOINT, LaunchSpec,
    ProcessHandle, ProcessLauncher, SIDECAR_SUBCOMMAND, SidecarEnv,
};
pub use publisher::{
    EXPORT_CACHE_ADDRESS, OUTPUT_CACHE_ADDRESS, OUTPUT_CACHE_ENDPOINT, OUTPUT_CACHE_SOCKET,
    OUTPUT_VERSION, Publisher,
};
pub use resolver::{
    BinaryResolver, DEFAULT_RELEASES_URL, LATEST, ReleaseResolver, ResolvedBinary, TOOL_NAME,
    binary_identifier, map_arch, map_os,
};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome, parse_pid};
pub use signals::{Liveness, ProcessSignals, SignalError, SystemSignals};
pub use startup::{
    AddressSource, ResolvedAddress, StartupCoordinator, StartupOutputs, choose_address,
    socket_path,
};
pub use state_store::{
    FileStateStore, MemoryStateStore, STATE_HOST, STATE_LOG, STATE_PID, StateStore,
};
pub use stats::{CacheStats, StatsFetch, StatsFetcher, stats_url};
pub use stop::{StopCoordinator, StopReport};
