use crate::LogLevel;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How log records are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Timestamped lines with level and source location
    Plain,
    /// GitHub workflow commands (`::warning::`, `::error::`, ...)
    Github,
}

impl LogFormat {
    /// `Github` when running inside GitHub Actions, `Plain` otherwise.
    pub fn detect() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(val) if val == "true" => LogFormat::Github,
            _ => LogFormat::Plain,
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(LogFormat::Plain),
            "github" => Ok(LogFormat::Github),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => f.write_str("plain"),
            LogFormat::Github => f.write_str("github"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub colored: bool,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: false,
            format: LogFormat::detect(),
        }
    }
}
