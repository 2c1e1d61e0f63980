use crate::tests::{EnvGuard, clean_env, write_config_file};
use crate::{Config, LogFormat};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, ok, some};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Defaults
// =========================================================================

#[test]
#[serial]
fn given_no_file_and_no_env_when_load_then_defaults_apply() {
    // Given
    let _env = clean_env();

    // When
    let config = Config::load(None).unwrap();

    // Then
    assert_that!(config.sidecar.host.as_str(), eq("localhost:12321"));
    assert_that!(config.sidecar.version.as_str(), eq("latest"));
    assert_that!(config.sidecar.prefix, none());
    assert_that!(config.discovery.attempts, eq(20));
    assert_that!(config.discovery.delay_ms, eq(250));
    assert_that!(config.health.attempts, eq(10));
    assert_that!(config.health.delay_ms, eq(1000));
    assert_that!(config.shutdown.poll_interval_ms, eq(500));
    assert_that!(config.shutdown.timeout_ms, eq(10_000));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_no_log_file_configured_when_resolving_then_uses_temp_dir() {
    let _env = clean_env();

    let config = Config::load(None).unwrap();

    assert_that!(
        config.paths.log_file_path(),
        eq(&std::env::temp_dir().join("omni-cache.log"))
    );
}

// =========================================================================
// TOML file
// =========================================================================

#[test]
#[serial]
fn given_toml_file_when_load_then_values_are_read() {
    // Given
    let _env = clean_env();
    let (_temp, path) = write_config_file(
        r#"
[sidecar]
bucket = "ci-cache"
prefix = "linux/"
version = "v0.7.0"

[health]
attempts = 30

[logging]
level = "debug"
format = "plain"
"#,
    );

    // When
    let config = Config::load(Some(&path)).unwrap();

    // Then
    assert_that!(config.sidecar.bucket.as_str(), eq("ci-cache"));
    assert_that!(config.sidecar.prefix.as_deref(), some(eq("linux/")));
    assert_that!(config.sidecar.version.as_str(), eq("v0.7.0"));
    assert_that!(config.health.attempts, eq(30));
    assert_that!(config.health.delay_ms, eq(1000));
    assert_that!(*config.logging.level, eq(LevelFilter::Debug));
    assert_that!(config.logging.format, eq(LogFormat::Plain));
}

#[test]
#[serial]
fn given_config_file_env_var_when_load_then_file_is_used() {
    let _env = clean_env();
    let (_temp, path) = write_config_file("[sidecar]\nbucket = \"from-env-file\"\n");
    let _file = EnvGuard::set("OC_CONFIG_FILE", path.to_str().unwrap());

    let config = Config::load(None).unwrap();

    assert_that!(config.sidecar.bucket.as_str(), eq("from-env-file"));
}

#[test]
#[serial]
fn given_missing_named_file_when_load_then_error() {
    let _env = clean_env();
    let temp = tempfile::TempDir::new().unwrap();

    let result = Config::load(Some(&temp.path().join("absent.toml")));

    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_invalid_toml_when_load_then_error() {
    let _env = clean_env();
    let (_temp, path) = write_config_file("[sidecar\nbucket = ");

    let result = Config::load(Some(&path));

    assert_that!(result, err(anything()));
}

// =========================================================================
// Environment overrides
// =========================================================================

#[test]
#[serial]
fn given_oc_env_vars_when_load_then_override_file_values() {
    // Given
    let _env = clean_env();
    let (_temp, path) = write_config_file("[discovery]\nattempts = 5\n");
    let _attempts = EnvGuard::set("OC_DISCOVERY_ATTEMPTS", "40");
    let _timeout = EnvGuard::set("OC_SHUTDOWN_TIMEOUT_MS", "2000");

    // When
    let config = Config::load(Some(&path)).unwrap();

    // Then
    assert_that!(config.discovery.attempts, eq(40));
    assert_that!(config.shutdown.timeout_ms, eq(2000));
}

#[test]
#[serial]
fn given_action_inputs_when_load_then_sidecar_fields_are_set() {
    // Given
    let _env = clean_env();
    let _bucket = EnvGuard::set("INPUT_BUCKET", "b");
    let _prefix = EnvGuard::set("INPUT_PREFIX", "pr/");
    let _endpoint = EnvGuard::set("INPUT_S3-ENDPOINT", "http://minio:9000");
    let _version = EnvGuard::set("INPUT_VERSION", "v0.7.0");

    // When
    let config = Config::load(None).unwrap();

    // Then
    assert_that!(config.sidecar.bucket.as_str(), eq("b"));
    assert_that!(config.sidecar.prefix.as_deref(), some(eq("pr/")));
    assert_that!(
        config.sidecar.storage_endpoint.as_deref(),
        some(eq("http://minio:9000"))
    );
    assert_that!(config.sidecar.version.as_str(), eq("v0.7.0"));
}

#[test]
#[serial]
fn given_blank_action_inputs_when_load_then_defaults_are_kept() {
    let _env = clean_env();
    let _host = EnvGuard::set("INPUT_HOST", "");
    let _version = EnvGuard::set("INPUT_VERSION", "   ");
    let _prefix = EnvGuard::set("INPUT_PREFIX", "");

    let config = Config::load(None).unwrap();

    assert_that!(config.sidecar.host.as_str(), eq("localhost:12321"));
    assert_that!(config.sidecar.version.as_str(), eq("latest"));
    assert_that!(config.sidecar.prefix, none());
}

#[test]
#[serial]
fn given_unparseable_numeric_env_when_load_then_value_is_ignored() {
    let _env = clean_env();
    let _attempts = EnvGuard::set("OC_HEALTH_ATTEMPTS", "lots");

    let config = Config::load(None).unwrap();

    assert_that!(config.health.attempts, eq(10));
}
