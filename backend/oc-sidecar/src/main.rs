//! omni-cache-sidecar
//!
//! Runs the omni-cache sidecar for the duration of a CI job.
//!
//! ```bash
//! # Before the job: download, launch, wait until healthy
//! omni-cache-sidecar start
//!
//! # After the job: print cache statistics and stop the sidecar
//! omni-cache-sidecar stop
//! ```

use oc_config::{Config, LoggingConfig};
use oc_sidecar::{Cli, Commands, logger, phases};

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logger first, even if the config is broken, so the failure is visible
    let loaded = Config::load(cli.config.as_deref());
    let logging = match loaded {
        Ok(ref config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    if let Err(e) = logger::initialize(&logging) {
        eprintln!("{e}");
    }

    match cli.command {
        Commands::Start => {
            let result = match loaded {
                Ok(config) => {
                    config.log_summary();
                    phases::run_start(&config).await
                }
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(outputs) => {
                    info!(
                        "omni-cache {} running with PID {}",
                        outputs.resolved_version, outputs.pid
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Stop => {
            let config = loaded
                .and_then(|config| config.validate().map(|()| config))
                .unwrap_or_else(|e| {
                    warn!("{e}; continuing with default settings");
                    Config::default()
                });
            config.log_summary();

            phases::run_stop(&config).await;
            ExitCode::SUCCESS
        }
    }
}
