//! Wiring of real collaborators into the two lifecycle phases.

use crate::error::Result as CliResult;
use crate::github::GithubPublisher;

use oc_config::Config;
use oc_lifecycle::{
    DetachedLauncher, FileStateStore, MemoryStateStore, ReleaseResolver, StartupCoordinator,
    StartupOutputs, StateStore, StopCoordinator, StopReport, SystemSignals,
};

use log::warn;

/// Start phase. Any error is terminal for the job.
pub async fn run_start(config: &Config) -> CliResult<StartupOutputs> {
    config.validate_for_start()?;

    let mut state = FileStateStore::create(&config.paths.state_file_path())?;
    let resolver = ReleaseResolver::new(config.paths.tool_cache_dir())?;
    let launcher = DetachedLauncher;
    let mut publisher = GithubPublisher::from_env();

    let outputs = StartupCoordinator::new(config, &resolver, &launcher, &mut state, &mut publisher)
        .start()
        .await?;

    Ok(outputs)
}

/// Stop phase. Never fails; an unreadable state file just means nothing to stop.
pub async fn run_stop(config: &Config) -> StopReport {
    let path = config.paths.state_file_path();
    let state: Box<dyn StateStore> = match FileStateStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Could not read omni-cache state: {e}");
            Box::new(MemoryStateStore::new())
        }
    };

    let signals = SystemSignals;
    let mut publisher = GithubPublisher::from_env();

    StopCoordinator::new(config, state.as_ref(), &signals, &mut publisher)
        .stop()
        .await
}
