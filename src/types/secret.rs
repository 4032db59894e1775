//! An authentication secret that never leaks in full.
//!
//! Log records need *some* handle on which token was attempted (the original
//! operators correlate on the first three characters), but a full token in a
//! log line is an incident. `Secret` makes the safe rendering the only
//! rendering: `Debug` and `Display` both emit the truncated prefix.

use serde::Deserialize;
use std::fmt;

/// Number of leading characters exposed for log correlation.
const PREFIX_LEN: usize = 3;

/// An opaque credential secret (a GitHub token).
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Secret(s.into())
    }

    /// Exposes the full secret for the authenticated API call.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A short, non-reversible prefix for log correlation, e.g. `"abc..."`.
    ///
    /// Never longer than [`PREFIX_LEN`] characters plus the ellipsis,
    /// regardless of the secret's length, and safe on multi-byte input.
    pub fn prefix(&self) -> String {
        let prefix: String = self.0.chars().take(PREFIX_LEN).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", self.prefix())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Secret(s)
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Secret(s.to_string())
    }
}
