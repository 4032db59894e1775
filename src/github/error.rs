//! Classification of GitHub commit-status rejections.
//!
//! The distinction drives the credential-failover loop:
//!
//! - **Retryable** (401/403/404) means the *credential* was rejected — wrong
//!   token, suspended account, rate limit, or a repo this token cannot see.
//!   The next credential in the queue may still succeed.
//! - **TerminalForCommit** (422) means GitHub will accept no more statuses on
//!   this commit, whoever asks. Trying further credentials would only burn
//!   API budget, so the whole loop stops.
//! - **Unexpected** is every other non-success code. It is logged and then
//!   propagated as a hard failure so the surrounding job system's retry
//!   policy (and an operator) sees it, rather than being swallowed here.

use thiserror::Error;

/// How a non-success HTTP status affects the failover loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No more statuses can be recorded for this commit; stop the whole loop.
    TerminalForCommit,

    /// This credential was rejected; the next one may work.
    Retryable,

    /// A status this crate has no contract for; propagate as a hard failure.
    Unexpected,
}

impl FailureClass {
    /// Returns true if another credential is worth attempting after this.
    pub fn try_next_credential(self) -> bool {
        matches!(self, FailureClass::Retryable)
    }
}

/// Classifies a non-success HTTP status from the create-status endpoint.
pub fn classify(status: u16) -> FailureClass {
    match status {
        401 | 403 | 404 => FailureClass::Retryable,
        422 => FailureClass::TerminalForCommit,
        _ => FailureClass::Unexpected,
    }
}

/// The operator-facing reason string for a known rejection code.
pub fn reason(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("incorrect_auth"),
        403 => Some("incorrect_auth_or_suspended_acct_or_rate_limited"),
        404 => Some("repo_not_found_or_incorrect_auth"),
        422 => Some("maximum_number_of_statuses"),
        _ => None,
    }
}

/// A failure in the notification client below the level of an HTTP status:
/// the call never produced a response this crate can classify.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying GitHub client failed (connect, TLS, serialization).
    #[error("github client error: {0}")]
    Client(#[from] octocrab::Error),

    /// A response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The provider-agnostic delegation call was refused. Opaque by design;
    /// nothing in this crate interprets the status further.
    #[error("delegated status call failed with HTTP {0}")]
    Delegated(u16),
}
