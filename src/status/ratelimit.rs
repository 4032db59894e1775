//! Rate-limit telemetry parsed from GitHub response headers.
//!
//! Advisory only: the snapshot goes into rejection logs so operators can see
//! whether a credential was throttled, but nothing in this crate backs off on
//! it. Unparsable or missing headers read as zero rather than failing a task
//! over telemetry.

use chrono::Utc;
use http::HeaderMap;
use std::fmt;

/// A point-in-time view of a credential's GitHub rate-limit budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitInfo {
    /// Total requests allowed per window (`x-ratelimit-limit`).
    pub limit: i64,
    /// Requests remaining in the current window (`x-ratelimit-remaining`).
    pub remaining: i64,
    /// Seconds until the window resets (`x-ratelimit-reset` minus now).
    pub next_limit_reset_in: i64,
}

impl RateLimitInfo {
    /// Parses the snapshot from response headers against the current clock.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_headers_at(headers, Utc::now().timestamp())
    }

    /// Parses the snapshot against a supplied Unix timestamp.
    pub fn from_headers_at(headers: &HeaderMap, now: i64) -> Self {
        let reset = header_i64(headers, "x-ratelimit-reset");
        RateLimitInfo {
            limit: header_i64(headers, "x-ratelimit-limit"),
            remaining: header_i64(headers, "x-ratelimit-remaining"),
            next_limit_reset_in: if reset == 0 { 0 } else { reset - now },
        }
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "limit={},remaining={},next_limit_reset_in={}",
            self.limit, self.remaining, self.next_limit_reset_in
        )
    }
}

/// Reads a header as an integer, defaulting to zero when absent or malformed.
fn header_i64(headers: &HeaderMap, name: &str) -> i64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(entries: &[(&str, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn snapshot_computes_seconds_until_reset() {
        let now = 1_700_000_000;
        let map = headers(&[
            ("x-ratelimit-limit", "60".to_string()),
            ("x-ratelimit-remaining", "10".to_string()),
            ("x-ratelimit-reset", (now + 120).to_string()),
        ]);
        let info = RateLimitInfo::from_headers_at(&map, now);
        assert_eq!(
            info,
            RateLimitInfo {
                limit: 60,
                remaining: 10,
                next_limit_reset_in: 120
            }
        );
    }

    #[test]
    fn missing_headers_default_to_zero() {
        let info = RateLimitInfo::from_headers_at(&HeaderMap::new(), 1_700_000_000);
        assert_eq!(info, RateLimitInfo::default());
    }

    #[test]
    fn malformed_values_default_to_zero() {
        let map = headers(&[
            ("x-ratelimit-limit", "sixty".to_string()),
            ("x-ratelimit-remaining", "".to_string()),
            ("x-ratelimit-reset", "soon".to_string()),
        ]);
        let info = RateLimitInfo::from_headers_at(&map, 1_700_000_000);
        assert_eq!(info, RateLimitInfo::default());
    }

    #[test]
    fn display_is_a_single_log_token() {
        let info = RateLimitInfo {
            limit: 60,
            remaining: 10,
            next_limit_reset_in: 120,
        };
        assert_eq!(info.to_string(), "limit=60,remaining=10,next_limit_reset_in=120");
    }
}
