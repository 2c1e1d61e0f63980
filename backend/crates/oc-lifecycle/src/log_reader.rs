//! Address discovery from the sidecar's own log.
//!
//! The sidecar may log structured JSON objects or `key=value` text depending
//! on its configuration. Each candidate line is tried as JSON first and falls
//! through to the text pattern on any failure; only a total miss is reported,
//! as `None`.

use crate::Publisher;

use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

static ADDR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)addr=(?:"([^"]*)"|(\S+))"#).expect("addr pattern is a valid regex")
});

const MESSAGE_KEYS: [&str; 2] = ["msg", "message"];

/// Address announced by the most recent startup line in `log_text`.
///
/// Lines not mentioning `marker` are skipped; later lines win over earlier ones.
pub fn extract_address(log_text: &str, marker: &str) -> Option<String> {
    log_text
        .lines()
        .rev()
        .filter(|line| line.contains(marker))
        .find_map(|line| structured_address(line, marker).or_else(|| text_address(line)))
}

/// `{"msg": "<marker>", "addr": "..."}`
fn structured_address(line: &str, marker: &str) -> Option<String> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }

    let value: Value = serde_json::from_str(trimmed).ok()?;
    let object = value.as_object()?;

    let announces_startup = MESSAGE_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .any(|message| message.trim() == marker);
    if !announces_startup {
        return None;
    }

    object
        .get("addr")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(String::from)
}

/// `... addr="..."` or `... addr=...`
fn text_address(line: &str) -> Option<String> {
    let captures = ADDR_TOKEN.captures(line)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().trim())
        .filter(|addr| !addr.is_empty())
        .map(String::from)
}

/// Whole-file snapshot of the log. A missing or unreadable file reads as empty.
pub async fn read_log(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!("Could not read log file {}: {e}", path.display());
            String::new()
        }
    }
}

/// Surface the sidecar log inside a collapsible group, if there is anything to show.
pub async fn display_logs(path: &Path, title: &str, publisher: &mut dyn Publisher) {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return;
    }

    let logs = read_log(path).await;
    if !logs.trim().is_empty() {
        publisher.group(title, &logs);
    }
}
