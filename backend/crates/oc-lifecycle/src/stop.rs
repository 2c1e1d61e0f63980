//! Stop phase: report statistics, surface logs, shut the sidecar down.
//!
//! Nothing here fails the job. Every problem becomes a warning.

use crate::{
    ProcessSignals, Publisher, STATE_HOST, STATE_LOG, STATE_PID, ShutdownCoordinator,
    ShutdownOutcome, StateStore, StatsFetch, StatsFetcher, log_reader,
};

use std::path::PathBuf;

use log::{debug, info, warn};
use oc_config::Config;

const STATS_TITLE: &str = "omni-cache Statistics";
const LOGS_TITLE: &str = "omni-cache logs";

/// What the stop phase observed. `None` fields were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct StopReport {
    pub stats: Option<StatsFetch>,
    pub outcome: Option<ShutdownOutcome>,
}

pub struct StopCoordinator<'a> {
    config: &'a Config,
    state: &'a dyn StateStore,
    signals: &'a dyn ProcessSignals,
    publisher: &'a mut dyn Publisher,
}

impl<'a> StopCoordinator<'a> {
    pub fn new(
        config: &'a Config,
        state: &'a dyn StateStore,
        signals: &'a dyn ProcessSignals,
        publisher: &'a mut dyn Publisher,
    ) -> Self {
        Self {
            config,
            state,
            signals,
            publisher,
        }
    }

    pub async fn stop(&mut self) -> StopReport {
        let Some(raw_pid) = self.state.load(STATE_PID) else {
            info!("No omni-cache process to clean up");
            return StopReport {
                stats: None,
                outcome: None,
            };
        };

        let config = self.config;
        let host = self
            .state
            .load(STATE_HOST)
            .unwrap_or_else(|| config.sidecar.host.clone());

        let stats = self.report_stats(&host).await;

        let log_file = self
            .state
            .load(STATE_LOG)
            .map(PathBuf::from)
            .unwrap_or_else(|| config.paths.log_file_path());
        log_reader::display_logs(&log_file, LOGS_TITLE, self.publisher).await;

        let outcome = ShutdownCoordinator::new(self.signals, &config.shutdown)
            .shutdown(Some(&raw_pid))
            .await;

        StopReport { stats, outcome }
    }

    async fn report_stats(&mut self, host: &str) -> Option<StatsFetch> {
        let fetcher = match StatsFetcher::new(self.config.stats.request_timeout()) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not fetch cache statistics: {e}");
                return None;
            }
        };

        let fetch = fetcher.fetch(host).await;

        if let Some(body) = fetch.body() {
            self.publisher.group(STATS_TITLE, body);
        }

        if let Some(warning) = fetch.warning() {
            warn!("{warning}");
        }

        match &fetch {
            StatsFetch::Empty => debug!("Cache statistics response was empty"),
            StatsFetch::Structured { stats: None, .. } => {
                debug!("Cache statistics carried no hit/miss counters")
            }
            _ => {}
        }

        if let Some(stats) = fetch.cache_stats() {
            info!("{}", stats.report_line());
            if let Err(e) = self.publisher.append_summary(&stats.summary_markdown()) {
                warn!("Could not write job summary: {e}");
            }
        }

        Some(fetch)
    }
}
