//! Commit-status body construction and response telemetry.
//!
//! Pure formatting and lookup: mapping build states into GitHub's status
//! vocabulary lives on the types themselves; this module assembles the
//! outbound request body (state, description, target URL, context) and parses
//! the advisory rate-limit snapshot out of response headers.

pub mod ratelimit;
pub mod request;

pub use ratelimit::RateLimitInfo;
pub use request::{context, target_url, StatusRequest};
