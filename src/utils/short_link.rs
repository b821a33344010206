//! Short link construction from HTTP request headers.

use axum::http::{HeaderMap, header};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Returns the origin (`scheme://host[:port]`) the client used to reach us.
///
/// The scheme comes from `X-Forwarded-Proto` (first value, `http` or `https`,
/// default `http`) and the authority from the `Host` header, port included.
/// When the `Host` header is missing or unusable, `fallback` is returned
/// unchanged.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// let origin = request_origin(&headers, "http://localhost:8080");
/// assert_eq!(origin, "http://s.example.com:8080");
/// ```
pub fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    let Some(host) = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| is_plausible_host(h))
    else {
        return fallback.trim_end_matches('/').to_string();
    };

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".to_string());

    format!("{scheme}://{host}")
}

/// Joins an origin and a short id into a full short link.
pub fn short_url(origin: &str, code: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), code)
}

fn is_plausible_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#' | '@'))
}
