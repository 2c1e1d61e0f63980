//! Canonical `host:port` form for requested and discovered addresses.

use url::Url;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Collapse a host or URL into `host:port`.
///
/// Blank input yields an empty string. URLs keep only their authority;
/// anything else is returned trimmed. Never touches the network or disk.
pub fn normalize(host_or_url: &str) -> String {
    let trimmed = host_or_url.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Some(scheme) = SCHEMES
        .iter()
        .find(|scheme| starts_with_ignore_case(trimmed, scheme))
    else {
        return trimmed.to_string();
    };

    match Url::parse(trimmed) {
        Ok(url) if url.host_str().is_some() => authority(&url),
        _ => strip_scheme(trimmed, scheme),
    }
}

/// Base URL for HTTP requests against `host`, keeping an explicit scheme.
pub fn http_base(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(trimmed, scheme))
    {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// `host[:port]` as written in the URL; `Url::port` drops scheme-default ports.
fn authority(url: &Url) -> String {
    let host = match url.host() {
        Some(url::Host::Ipv6(addr)) => format!("[{addr}]"),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

fn strip_scheme(input: &str, scheme: &str) -> String {
    let rest = &input[scheme.len()..];
    rest.split('/').next().unwrap_or_default().to_string()
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
