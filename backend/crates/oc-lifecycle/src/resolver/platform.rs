use crate::{LifecycleError, LifecycleResult};

use std::panic::Location;

use error_location::ErrorLocation;

const SUPPORTED_PLATFORMS: &str = "darwin, linux, freebsd, netbsd, openbsd";
const SUPPORTED_ARCHES: &str = "x86_64 (amd64), aarch64 (arm64), arm, s390x";

/// Release asset name for this host, e.g. `omni-cache-linux-amd64`.
pub fn binary_identifier() -> LifecycleResult<String> {
    let os = map_os(std::env::consts::OS)?;
    let arch = map_arch(std::env::consts::ARCH)?;
    Ok(format!("{}-{os}-{arch}", super::TOOL_NAME))
}

#[track_caller]
pub fn map_os(os: &str) -> LifecycleResult<&'static str> {
    match os {
        "macos" | "darwin" => Ok("darwin"),
        "linux" => Ok("linux"),
        "freebsd" => Ok("freebsd"),
        "netbsd" => Ok("netbsd"),
        "openbsd" => Ok("openbsd"),
        other => Err(LifecycleError::Platform {
            kind: "platform",
            value: other.to_string(),
            supported: SUPPORTED_PLATFORMS,
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
pub fn map_arch(arch: &str) -> LifecycleResult<&'static str> {
    match arch {
        "x86_64" => Ok("amd64"),
        "aarch64" => Ok("arm64"),
        "arm" => Ok("arm"),
        "s390x" => Ok("s390x"),
        other => Err(LifecycleError::Platform {
            kind: "architecture",
            value: other.to_string(),
            supported: SUPPORTED_ARCHES,
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
