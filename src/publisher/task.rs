//! The status-publishing orchestrator.
//!
//! One task execution runs strictly sequentially: a non-GitHub repository is
//! delegated whole; otherwise the app-installation path is attempted exactly
//! once when an installation id is present, and only when no installation id
//! exists does the legacy per-token loop run. The two paths never mix within
//! an execution — trying credentials concurrently against the per-commit
//! status limit would waste the limited allowed updates and make the
//! stop-on-terminal contract race-prone.
//!
//! Every branch emits one structured record under the `github_status` target
//! with enough fields to reconstruct the decision out-of-band. Secrets appear
//! only as a three-character prefix.

use std::time::Duration;

use tracing::{error, info};

use crate::github::{AuthMode, SinkError, StatusSink};
use crate::status::{RateLimitInfo, StatusRequest};
use crate::types::{CredentialLabel, InstallationId, Sha, StatusPayload};

use super::credentials::CredentialQueue;
use super::outcome::{DeliveredVia, Delivery, PublishError, PublishOutcome};

/// Category marker on every log record from this module.
const LOG_TARGET: &str = "github_status";

/// Configuration the surrounding system supplies at construction.
///
/// Passed in explicitly rather than read from process-wide state; TLS options
/// ride on the base client the sink was built with.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Base host for status target URLs, e.g. `https://travis-ci.example.com`.
    pub http_host: String,
}

/// Publishes one build's commit status, failing over across credentials.
pub struct StatusPublisher<S> {
    sink: S,
    config: PublisherConfig,
}

impl<S: StatusSink> StatusPublisher<S> {
    pub fn new(sink: S, config: PublisherConfig) -> Self {
        StatusPublisher { sink, config }
    }

    /// Runs one task execution to completion.
    ///
    /// `timeout` is the externally supplied deadline, passed through to every
    /// network call; cancellation on expiry is the caller's responsibility.
    pub async fn process(
        &self,
        payload: &StatusPayload,
        timeout: Duration,
    ) -> Result<Delivery, PublishError> {
        let request = StatusRequest::new(
            &self.config.http_host,
            &payload.repository,
            payload.build.id,
            payload.build.state,
            payload.is_pull_request(),
        );
        let sha = payload.sha();

        if !payload.repository.is_github() {
            self.sink
                .delegate(sha, payload.pull_request_number(), &request, timeout)
                .await?;
            return Ok(Delivery::Delegated);
        }

        let mut queue = CredentialQueue::from_payload(payload);

        if let Some(installation) = payload.params.installation {
            return self
                .process_via_app(installation, sha, &request, payload, queue.len(), timeout)
                .await;
        }

        self.process_with_tokens(&mut queue, sha, &request, payload, timeout)
            .await
    }

    /// The app-installation path, attempted exactly once. A classified
    /// rejection finishes the task; it never falls through to the legacy loop.
    async fn process_via_app(
        &self,
        installation: InstallationId,
        sha: &Sha,
        request: &StatusRequest,
        payload: &StatusPayload,
        tokens_count: usize,
        timeout: Duration,
    ) -> Result<Delivery, PublishError> {
        let auth = AuthMode::Installation(installation);
        let result = match self.sink.publish(&auth, sha, request, timeout).await {
            Ok(result) => result,
            Err(err) => {
                self.log_transport_failure(payload, sha, &err, self.sink.name());
                return Err(err.into());
            }
        };

        match PublishOutcome::from_attempt(result) {
            PublishOutcome::Success => {
                info!(
                    target: LOG_TARGET,
                    build = %payload.build.id,
                    repo = %payload.repository.slug,
                    state = %request.state,
                    commit = %sha,
                    tokens_count,
                    installation_id = installation.0,
                    processed_with = self.sink.name(),
                    "commit status published"
                );
                Ok(Delivery::Delivered(DeliveredVia::Installation))
            }
            PublishOutcome::Retryable {
                status,
                body,
                reason,
                ..
            }
            | PublishOutcome::Terminal {
                status,
                body,
                reason,
                ..
            } => {
                error!(
                    target: LOG_TARGET,
                    build = %payload.build.id,
                    repo = %payload.repository.slug,
                    state = %request.state,
                    commit = %sha,
                    installation_id = installation.0,
                    response_status = status,
                    reason,
                    processed_with = self.sink.name(),
                    body = %body,
                    "commit status rejected"
                );
                Ok(Delivery::Rejected { status })
            }
            PublishOutcome::Unexpected { status, body, .. } => {
                error!(
                    target: LOG_TARGET,
                    build = %payload.build.id,
                    repo = %payload.repository.slug,
                    error = "not_updated",
                    commit = %sha,
                    url = %request.target_url,
                    response_status = status,
                    processed_with = self.sink.name(),
                    body = %body,
                    "unexpected response publishing commit status"
                );
                Err(PublishError::UnexpectedStatus { status, body })
            }
        }
    }

    /// The legacy loop: drain the queue front-to-back until a credential
    /// succeeds, the commit hits its status limit, or something unexpected
    /// ends the task.
    async fn process_with_tokens(
        &self,
        queue: &mut CredentialQueue,
        sha: &Sha,
        request: &StatusRequest,
        payload: &StatusPayload,
        timeout: Duration,
    ) -> Result<Delivery, PublishError> {
        let tokens_count = queue.len();
        let mut tried: Vec<CredentialLabel> = Vec::new();

        while let Some(credential) = queue.take_next() {
            let auth = AuthMode::Token(credential.secret.clone());
            let result = match self.sink.publish(&auth, sha, request, timeout).await {
                Ok(result) => result,
                Err(err) => {
                    self.log_transport_failure(payload, sha, &err, "user_token");
                    return Err(err.into());
                }
            };

            match PublishOutcome::from_attempt(result) {
                PublishOutcome::Success => {
                    info!(
                        target: LOG_TARGET,
                        build = %payload.build.id,
                        repo = %payload.repository.slug,
                        state = %request.state,
                        commit = %sha,
                        tokens_count,
                        username = %credential.label,
                        processed_with = "user_token",
                        token = %credential.secret.prefix(),
                        "commit status published"
                    );
                    return Ok(Delivery::Delivered(DeliveredVia::UserToken(
                        credential.label,
                    )));
                }
                PublishOutcome::Terminal {
                    status,
                    body,
                    headers,
                    reason,
                } => {
                    // No more statuses can be posted to this commit, so
                    // there's no point in trying further credentials.
                    error!(
                        target: LOG_TARGET,
                        build = %payload.build.id,
                        repo = %payload.repository.slug,
                        state = %request.state,
                        commit = %sha,
                        username = %credential.label,
                        response_status = status,
                        reason,
                        processed_with = "user_token",
                        body = %body,
                        last_token_tried = %credential.secret.prefix(),
                        rate_limit = %RateLimitInfo::from_headers(&headers),
                        "commit status limit reached"
                    );
                    return Ok(Delivery::CommitLimitReached);
                }
                PublishOutcome::Retryable {
                    status,
                    body,
                    headers,
                    reason,
                } => {
                    error!(
                        target: LOG_TARGET,
                        build = %payload.build.id,
                        repo = %payload.repository.slug,
                        state = %request.state,
                        error = "not_updated",
                        commit = %sha,
                        username = %credential.label,
                        url = %request.target_url,
                        response_status = status,
                        reason,
                        processed_with = "user_token",
                        body = %body,
                        tokens_tried = %join_labels(&tried),
                        last_token_tried = %credential.secret.prefix(),
                        rate_limit = %RateLimitInfo::from_headers(&headers),
                        "credential rejected, trying next"
                    );
                    tried.push(credential.label);
                }
                PublishOutcome::Unexpected { status, body, .. } => {
                    error!(
                        target: LOG_TARGET,
                        build = %payload.build.id,
                        repo = %payload.repository.slug,
                        error = "not_updated",
                        commit = %sha,
                        url = %request.target_url,
                        response_status = status,
                        processed_with = "user_token",
                        body = %body,
                        last_token_tried = %credential.secret.prefix(),
                        "unexpected response publishing commit status"
                    );
                    return Err(PublishError::UnexpectedStatus { status, body });
                }
            }
        }

        // Exhaustion is a soft failure by design: the per-attempt rejection
        // records above are its only trace.
        Ok(Delivery::Exhausted { tried })
    }

    fn log_transport_failure(
        &self,
        payload: &StatusPayload,
        sha: &Sha,
        err: &SinkError,
        processed_with: &str,
    ) {
        error!(
            target: LOG_TARGET,
            build = %payload.build.id,
            repo = %payload.repository.slug,
            error = "not_updated",
            commit = %sha,
            processed_with,
            message = %err,
            "commit status call failed without an interpretable response"
        );
    }
}

/// Credential labels already rejected this execution, as one log token.
fn join_labels(labels: &[CredentialLabel]) -> String {
    labels
        .iter()
        .map(CredentialLabel::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
