use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "omni-cache-sidecar")]
#[command(about = "Start and stop the omni-cache sidecar around a CI job")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file (falls back to OC_CONFIG_FILE, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}
