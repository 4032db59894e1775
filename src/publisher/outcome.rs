//! The unified result vocabulary for publish attempts.
//!
//! Both publishing paths (app installation and legacy per-token) produce a
//! raw [`AttemptResult`]; classification folds it into one [`PublishOutcome`]
//! the orchestrator consumes uniformly, instead of branching on two failure
//! representations.

use http::HeaderMap;
use thiserror::Error;

use crate::github::{classify, reason, AttemptResult, FailureClass, SinkError};
use crate::types::CredentialLabel;

/// One publish attempt, classified.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// The provider recorded the status.
    Success,

    /// The credential was rejected (401/403/404); try the next one.
    Retryable {
        status: u16,
        body: String,
        headers: HeaderMap,
        reason: &'static str,
    },

    /// The commit can take no more statuses (422); stop the whole loop.
    Terminal {
        status: u16,
        body: String,
        headers: HeaderMap,
        reason: &'static str,
    },

    /// A status outside this crate's contract; becomes a hard failure.
    Unexpected {
        status: u16,
        body: String,
        headers: HeaderMap,
    },
}

impl PublishOutcome {
    /// Classifies a raw attempt result.
    pub fn from_attempt(result: AttemptResult) -> Self {
        match result {
            AttemptResult::Accepted => PublishOutcome::Success,
            AttemptResult::Rejected {
                status,
                body,
                headers,
            } => match classify(status) {
                FailureClass::Retryable => PublishOutcome::Retryable {
                    status,
                    body,
                    headers,
                    reason: reason(status).unwrap_or("unclassified"),
                },
                FailureClass::TerminalForCommit => PublishOutcome::Terminal {
                    status,
                    body,
                    headers,
                    reason: reason(status).unwrap_or("unclassified"),
                },
                FailureClass::Unexpected => PublishOutcome::Unexpected {
                    status,
                    body,
                    headers,
                },
            },
        }
    }
}

/// Which path delivered a successful status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveredVia {
    /// The app-installation path.
    Installation,

    /// The legacy loop, with the label of the credential that succeeded.
    UserToken(CredentialLabel),
}

/// How one task execution ended, short of a hard failure.
///
/// Only [`Delivery::Delivered`] put a status on the commit; the other
/// variants are soft outcomes the caller may observe but need not act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Exactly one status was recorded.
    Delivered(DeliveredVia),

    /// The app path was rejected with a classified code. By design this does
    /// not fall back to the legacy loop.
    Rejected { status: u16 },

    /// A legacy attempt hit the per-commit status limit; remaining
    /// credentials were not tried.
    CommitLimitReached,

    /// Every credential was rejected for authorization reasons, or none were
    /// supplied. Soft failure: visible only through the per-attempt logs.
    Exhausted { tried: Vec<CredentialLabel> },

    /// The repository is not GitHub-hosted; the publish was delegated whole.
    Delegated,
}

/// Failures the task surfaces to the surrounding job system.
///
/// Everything else (credential rejections, the commit status limit, queue
/// exhaustion) is recovered locally and reported through [`Delivery`].
#[derive(Debug, Error)]
pub enum PublishError {
    /// The provider answered with a status outside the classification
    /// contract; surfaced so operators notice new failure modes.
    #[error("github returned unexpected HTTP {status} for commit status")]
    UnexpectedStatus { status: u16, body: String },

    /// The notification client failed without an interpretable response.
    #[error(transparent)]
    Transport(#[from] SinkError),
}
