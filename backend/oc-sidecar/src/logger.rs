use crate::error::{CliError, Result as CliResult};

use oc_config::{LogFormat, LoggingConfig};

use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, debug};

/// Workflow command a record at `level` is rendered as, if any.
///
/// Info has no command; it prints as a bare line.
pub fn workflow_command(level: Level) -> Option<&'static str> {
    match level {
        Level::Error => Some("error"),
        Level::Warn => Some("warning"),
        Level::Debug | Level::Trace => Some("debug"),
        Level::Info => None,
    }
}

/// One record as a GitHub Actions log line.
///
/// Multi-line messages are escaped so the whole record stays one annotation.
pub fn github_line(level: Level, message: &str) -> String {
    match workflow_command(level) {
        Some(command) => {
            let escaped = message
                .replace('%', "%25")
                .replace('\r', "%0D")
                .replace('\n', "%0A");
            format!("::{command}::{escaped}")
        }
        None => message.to_string(),
    }
}

/// Initialize logger with fern
///
/// All output goes to stdout, which the CI runner captures.
#[track_caller]
pub fn initialize(config: &LoggingConfig) -> CliResult<()> {
    let level_filter = config.level.0;

    let base_dispatch = Dispatch::new().level(level_filter);

    let dispatch = match config.format {
        LogFormat::Github => Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}",
                    github_line(record.level(), &message.to_string())
                ))
            })
            .chain(std::io::stdout()),
        LogFormat::Plain if config.colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{date} - {level}] {message} [{file}:{line}]",
                        date = humantime::format_rfc3339(SystemTime::now()),
                        level = colors.color(record.level()),
                        message = message,
                        file = record.file().unwrap_or("unknown"),
                        line = record.line().unwrap_or(0),
                    ))
                })
                .chain(std::io::stdout())
        }
        LogFormat::Plain => Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = humantime::format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0),
                ))
            })
            .chain(std::io::stdout()),
    };

    base_dispatch
        .chain(dispatch)
        .apply()
        .map_err(|e| CliError::logger(e.to_string()))?;

    debug!(
        "Logger initialized: level={:?}, format={}",
        level_filter, config.format
    );

    Ok(())
}
