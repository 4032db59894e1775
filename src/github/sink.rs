//! The notification-client seam.
//!
//! [`StatusSink`] is the capability the orchestrator is handed for "create or
//! update a commit status". The production implementation executes against
//! GitHub via octocrab; tests script a fake.
//!
//! # Example (fake for testing)
//!
//! ```ignore
//! struct ScriptedSink {
//!     responses: Mutex<VecDeque<Result<AttemptResult, SinkError>>>,
//! }
//!
//! impl StatusSink for ScriptedSink {
//!     fn name(&self) -> &str {
//!         "scripted"
//!     }
//!
//!     async fn publish(
//!         &self,
//!         _auth: &AuthMode,
//!         _sha: &Sha,
//!         _request: &StatusRequest,
//!         _timeout: Duration,
//!     ) -> Result<AttemptResult, SinkError> {
//!         self.responses.lock().unwrap().pop_front().unwrap()
//!     }
//!
//!     async fn delegate(/* ... */) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use http::HeaderMap;

use crate::status::StatusRequest;
use crate::types::{InstallationId, Secret, Sha};

use super::error::SinkError;

/// Which authentication one publish attempt uses.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// The app-installation path: authenticate as the GitHub App installed on
    /// the repository.
    Installation(InstallationId),

    /// The legacy path: authenticate with one per-user token.
    Token(Secret),
}

/// Raw result of one create-status call that reached the provider.
///
/// Both publishing paths produce this one shape; classification into
/// retryable/terminal happens in the orchestrator, not here.
#[derive(Debug, Clone)]
pub enum AttemptResult {
    /// The provider recorded the status.
    Accepted,

    /// The provider answered with a non-success status.
    Rejected {
        status: u16,
        body: String,
        headers: HeaderMap,
    },
}

/// Creates or updates commit statuses for one repository.
///
/// Implementations are constructed scoped to a repository (via the factory in
/// [`super::client`]), so calls carry only the commit and the body. The
/// `timeout` argument is the externally supplied deadline for the task; the
/// sink passes it through to the network call and implements no retry or
/// backoff of its own.
pub trait StatusSink {
    /// Name of the installation-path client, for `processed_with` log fields.
    fn name(&self) -> &str;

    /// One create-status attempt against GitHub.
    ///
    /// Returns `Ok(AttemptResult::Rejected { .. })` for any response with a
    /// non-success HTTP status; `Err` only when no classifiable response was
    /// produced at all.
    fn publish(
        &self,
        auth: &AuthMode,
        sha: &Sha,
        request: &StatusRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<AttemptResult, SinkError>> + Send;

    /// Delegates the whole publish for repositories hosted elsewhere than
    /// GitHub. Opaque: errors surface untouched.
    fn delegate(
        &self,
        sha: &Sha,
        pr_number: Option<u64>,
        request: &StatusRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}
