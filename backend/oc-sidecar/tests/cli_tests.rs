//! Command-line parsing of the two phases.

use oc_sidecar::{Cli, Commands};

use std::path::PathBuf;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_start_when_parsed_then_start_phase_without_config() {
    let cli = Cli::try_parse_from(["omni-cache-sidecar", "start"]).unwrap();

    assert_that!(cli.command, eq(Commands::Start));
    assert_that!(cli.config, none());
}

#[test]
fn given_config_after_subcommand_when_parsed_then_path_is_kept() {
    let cli =
        Cli::try_parse_from(["omni-cache-sidecar", "stop", "--config", "/etc/oc.toml"]).unwrap();

    assert_that!(cli.command, eq(Commands::Stop));
    assert_that!(cli.config, some(eq(&PathBuf::from("/etc/oc.toml"))));
}

#[test]
fn given_unknown_phase_when_parsed_then_error() {
    assert!(Cli::try_parse_from(["omni-cache-sidecar", "restart"]).is_err());
}
