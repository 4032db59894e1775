//! GitHub API client and rejection classification.
//!
//! This module provides the production notification client (octocrab-backed,
//! scoped to one repository) behind the [`StatusSink`] trait, plus the
//! classifier that decides whether a rejection ends one credential, the whole
//! commit, or the task.
//!
//! Key features:
//! - Installation-scoped and per-token authentication, selected per attempt
//! - Raw capture of rejection status, body, and headers for logging
//! - `Accept` header pinned to the v3 media type on token clients
//! - Task deadline passed through as the transport timeout

mod client;
mod error;
mod sink;

pub use client::{status_sink, OctocrabStatusSink};
pub use error::{classify, reason, FailureClass, SinkError};
pub use sink::{AttemptResult, AuthMode, StatusSink};
