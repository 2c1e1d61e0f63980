//! Cache statistics from the sidecar's `/metrics/cache` endpoint.

use crate::{LifecycleResult, address};

use std::time::Duration;

use log::debug;
use serde_json::Value;

const STATS_PATH: &str = "/metrics/cache";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Hit/miss counters reported by the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Counters from a parsed body carrying both `hits` and `misses`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let hits = counter(value.get("hits")?)?;
        let misses = counter(value.get("misses")?)?;
        Some(Self { hits, misses })
    }

    /// `hits / (hits + misses)` as a fraction; 0 when nothing was counted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Percentage to one decimal place, `"0%"` when nothing was counted.
    pub fn hit_rate_display(&self) -> String {
        if self.total() == 0 {
            String::from("0%")
        } else {
            format!("{:.1}%", self.hit_rate() * 100.0)
        }
    }

    /// Widened so counters near `u64::MAX` cannot overflow.
    fn total(&self) -> u128 {
        u128::from(self.hits) + u128::from(self.misses)
    }

    pub fn report_line(&self) -> String {
        format!(
            "Cache hit rate: {} ({} hits, {} misses)",
            self.hit_rate_display(),
            self.hits,
            self.misses
        )
    }

    /// Two-column metric/value table for the job summary.
    pub fn summary_markdown(&self) -> String {
        format!(
            "## omni-cache Statistics\n\n\
             | Metric | Value |\n\
             | --- | --- |\n\
             | Cache Hits | {} |\n\
             | Cache Misses | {} |\n\
             | Hit Rate | {} |\n",
            self.hits,
            self.misses,
            self.hit_rate_display()
        )
    }
}

/// Non-negative integer, accepting integral floats such as `100.0`.
fn counter(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Result of the single stats request.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsFetch {
    /// Network failure or non-success status
    Unavailable { reason: String },
    /// Success with a blank body
    Empty,
    /// Plain-text body, an expected shape
    Text { body: String },
    /// Looked like JSON but did not parse
    Malformed { body: String, reason: String },
    /// Parsed JSON; `stats` is set when both counters were present
    Structured {
        body: String,
        stats: Option<CacheStats>,
    },
}

impl StatsFetch {
    /// Body to show the user, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            StatsFetch::Text { body }
            | StatsFetch::Malformed { body, .. }
            | StatsFetch::Structured { body, .. } => Some(body),
            StatsFetch::Unavailable { .. } | StatsFetch::Empty => None,
        }
    }

    /// Warning for the user, if this outcome deserves one.
    pub fn warning(&self) -> Option<String> {
        match self {
            StatsFetch::Unavailable { reason } => Some(reason.clone()),
            StatsFetch::Malformed { reason, .. } => {
                Some(format!("Could not parse cache statistics JSON: {reason}"))
            }
            _ => None,
        }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        match self {
            StatsFetch::Structured { stats, .. } => *stats,
            _ => None,
        }
    }

    /// Classify an OK response body.
    pub fn from_body(raw: &str) -> Self {
        let cleaned = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
        let trimmed = cleaned.trim();

        if trimmed.is_empty() {
            return StatsFetch::Empty;
        }

        let body = cleaned.to_string();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return StatsFetch::Text { body };
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => StatsFetch::Structured {
                body,
                stats: CacheStats::from_value(&value),
            },
            Err(e) => StatsFetch::Malformed {
                body,
                reason: e.to_string(),
            },
        }
    }
}

pub struct StatsFetcher {
    client: reqwest::Client,
}

impl StatsFetcher {
    pub fn new(request_timeout: Duration) -> LifecycleResult<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client })
    }

    /// One GET against `host`; every failure is folded into the result.
    pub async fn fetch(&self, host: &str) -> StatsFetch {
        let url = stats_url(host);
        debug!("Fetching cache statistics from {url}");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return StatsFetch::Unavailable {
                    reason: format!("Could not fetch cache statistics: {e}"),
                };
            }
        };

        if !response.status().is_success() {
            return StatsFetch::Unavailable {
                reason: format!("Failed to fetch stats: HTTP {}", response.status().as_u16()),
            };
        }

        match response.text().await {
            Ok(body) => StatsFetch::from_body(&body),
            Err(e) => StatsFetch::Unavailable {
                reason: format!("Could not read cache statistics: {e}"),
            },
        }
    }
}

/// `http://<host>/metrics/cache`, or under the host's own scheme if it has one.
pub fn stats_url(host: &str) -> String {
    format!("{}{STATS_PATH}", address::http_base(host))
}
