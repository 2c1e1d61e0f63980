use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Failed to download omni-cache from {url}: {message} {location}")]
    Resolution {
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Unsupported {kind}: {value}. omni-cache supports: {supported} {location}")]
    Platform {
        kind: &'static str,
        value: String,
        supported: &'static str,
        location: ErrorLocation,
    },

    #[error("Failed to spawn {program}: {source} {location}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to open log file {path}: {source} {location}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("State store error at {path}: {message} {location}")]
    StateStore {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("omni-cache failed to become healthy after {attempts} attempts {location}")]
    HealthCheckFailed {
        attempts: u32,
        location: ErrorLocation,
    },

    #[error("Failed to publish {what}: {source} {location}")]
    Publish {
        what: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("HTTP error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

impl LifecycleError {
    /// Download or cache failure for a specific source URL
    #[track_caller]
    pub fn resolution<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Resolution {
            url: url.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn state_store<M: Into<String>>(path: PathBuf, message: M) -> Self {
        Self::StateStore {
            path,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn publish<W: Into<String>>(what: W, source: std::io::Error) -> Self {
        Self::Publish {
            what: what.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for LifecycleError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for LifecycleError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
