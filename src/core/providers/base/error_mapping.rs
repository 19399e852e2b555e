//! Classification of HTTP outcomes into canonical provider errors
//!
//! | Outcome | Category |
//! |---------|----------|
//! | 401, 403 | AuthError |
//! | 429 | RateLimited (`Retry-After` honoured) |
//! | 408, 504, client deadline | Timeout |
//! | other non-2xx, malformed body | InvalidResponse |
//! | connect refused, DNS, reset | Unavailable |
//! | request could not be built | ConfigError |

use crate::core::providers::unified_provider::ProviderError;
use chrono::{DateTime, Utc};

/// Map a non-2xx HTTP status to a provider error
pub fn map_status(
    provider: &str,
    status: u16,
    body: &str,
    retry_after: Option<&str>,
) -> ProviderError {
    match status {
        401 | 403 => ProviderError::authentication(
            provider,
            format!("HTTP {}: credentials rejected", status),
        ),
        429 => ProviderError::rate_limit(provider, retry_after.and_then(parse_retry_after)),
        408 | 504 => ProviderError::timeout(provider, format!("HTTP {} from upstream", status)),
        _ => ProviderError::http_status(provider, status, body),
    }
}

/// Map a transport-level reqwest error
pub fn map_reqwest_error(provider: &str, error: &reqwest::Error) -> ProviderError {
    if error.is_builder() {
        // Header or URL from configuration the client refuses; retrying cannot help
        ProviderError::configuration(provider, error.to_string())
    } else if error.is_timeout() {
        ProviderError::timeout(provider, error.to_string())
    } else if error.is_connect() {
        ProviderError::unavailable(provider, error.to_string())
    } else if error.is_decode() || error.is_body() {
        ProviderError::invalid_response(provider, error.to_string())
    } else {
        ProviderError::unavailable(provider, error.to_string())
    }
}

/// Parse a `Retry-After` header into seconds
///
/// Accepts both delta-seconds and an HTTP date. Dates in the past yield zero.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }
    if let Ok(seconds) = value.parse::<f64>() {
        return (seconds >= 0.0).then(|| seconds.ceil() as u64);
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&Utc) - Utc::now();
    Some(delta.num_seconds().max(0) as u64)
}
