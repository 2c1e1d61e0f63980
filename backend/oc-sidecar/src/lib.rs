//! omni-cache-sidecar library
//!
//! Host plumbing for the lifecycle crate: command line, logger and
//! GitHub Actions publishing.

pub mod cli;
pub mod commands;
pub mod error;
pub mod github;
pub mod logger;
pub mod phases;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result as CliResult};
pub use github::GithubPublisher;
