use crate::tests::{EnvGuard, clean_env};
use crate::{Config, LogFormat, LogLevel};

use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;
use serial_test::serial;

#[test]
fn given_unknown_level_name_when_parsed_then_defaults_to_info() {
    let level: LogLevel = "verbose".parse().unwrap();

    assert_that!(*level, eq(LevelFilter::Info));
}

#[test]
fn given_mixed_case_level_when_parsed_then_recognized() {
    let level: LogLevel = " WARN ".parse().unwrap();

    assert_that!(*level, eq(LevelFilter::Warn));
}

#[test]
#[serial]
fn given_github_actions_env_when_default_logging_then_github_format() {
    let _env = clean_env();
    let _gha = EnvGuard::set("GITHUB_ACTIONS", "true");

    let config = Config::load(None).unwrap();

    assert_that!(config.logging.format, eq(LogFormat::Github));
}

#[test]
#[serial]
fn given_explicit_format_env_when_load_then_overrides_detection() {
    let _env = clean_env();
    let _gha = EnvGuard::set("GITHUB_ACTIONS", "true");
    let _format = EnvGuard::set("OC_LOG_FORMAT", "plain");

    let config = Config::load(None).unwrap();

    assert_that!(config.logging.format, eq(LogFormat::Plain));
}

#[test]
#[serial]
fn given_runner_temp_when_resolving_state_file_then_placed_there() {
    let _env = clean_env();
    let temp = tempfile::TempDir::new().unwrap();
    let _runner = EnvGuard::set("RUNNER_TEMP", temp.path().to_str().unwrap());

    let config = Config::load(None).unwrap();

    assert_that!(
        config.paths.state_file_path(),
        eq(&temp.path().join("omni-cache-state.json"))
    );
}
