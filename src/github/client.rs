//! Octocrab-backed status sink scoped to a specific repository.
//!
//! This module provides `OctocrabStatusSink`, the production [`StatusSink`],
//! plus the factory that scopes it to one repository. All calls address the
//! repository by its provider id (`/repositories/{id}/...`), matching how the
//! upstream payload identifies repositories.
//!
//! Authentication is per call: the installation path derives an
//! installation-scoped client from the injected base `Octocrab`, the legacy
//! path builds a fresh personal-token client for each credential. TLS
//! configuration rides on the base client, which the embedding system builds.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use octocrab::Octocrab;
use serde::Serialize;

use crate::status::StatusRequest;
use crate::types::{Repository, Secret, Sha, VcsId};

use super::error::SinkError;
use super::sink::{AttemptResult, AuthMode, StatusSink};

/// Media type pinned on every create-status call.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// `processed_with` value logged for app-installation publishes.
const APP_CLIENT_NAME: &str = "github_apps";

/// Body of a delegated (non-GitHub) status call, forwarded verbatim to the
/// surrounding system's provider-agnostic VCS service.
#[derive(Debug, Serialize)]
struct DelegatedStatus<'a> {
    id: VcsId,
    #[serde(rename = "type")]
    vcs_type: &'a str,
    #[serde(rename = "ref")]
    commit_ref: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pr_number: Option<u64>,
    payload: &'a StatusRequest,
}

/// The production status sink, scoped to one repository.
pub struct OctocrabStatusSink {
    /// The injected base client. Carries app authentication (for the
    /// installation path) and any TLS configuration the embedder applied.
    base: Octocrab,

    /// The provider's id for the repository.
    repo_id: VcsId,

    /// The repository's hosting type string, forwarded on delegated calls.
    vcs_type: String,
}

/// Scopes a status-publishing capability to one repository.
///
/// This is the factory the embedding system calls once per task execution;
/// the orchestrator receives only the returned handle.
pub fn status_sink(base: Octocrab, repository: &Repository) -> OctocrabStatusSink {
    OctocrabStatusSink {
        base,
        repo_id: repository.vcs_id,
        vcs_type: repository.vcs_type.clone(),
    }
}

impl OctocrabStatusSink {
    /// The client used for one attempt under the given authentication.
    fn client_for(&self, auth: &AuthMode, timeout: Duration) -> Result<Octocrab, SinkError> {
        match auth {
            AuthMode::Installation(id) => {
                // Derived from the base client; inherits its TLS and timeout
                // configuration.
                Ok(self.base.installation(octocrab::models::InstallationId(id.0))?)
            }
            AuthMode::Token(secret) => Ok(token_client(secret, timeout)?),
        }
    }

    fn status_route(&self, sha: &Sha) -> String {
        format!("/repositories/{}/statuses/{}", self.repo_id, sha)
    }
}

/// Builds a fresh personal-token client for one legacy attempt, with the
/// task deadline applied as the transport timeout.
fn token_client(secret: &Secret, timeout: Duration) -> Result<Octocrab, octocrab::Error> {
    Octocrab::builder()
        .personal_token(secret.expose().to_string())
        .add_header(http::header::ACCEPT, GITHUB_ACCEPT.to_string())
        .set_connect_timeout(Some(timeout))
        .set_read_timeout(Some(timeout))
        .build()
}

impl StatusSink for OctocrabStatusSink {
    fn name(&self) -> &str {
        APP_CLIENT_NAME
    }

    async fn publish(
        &self,
        auth: &AuthMode,
        sha: &Sha,
        request: &StatusRequest,
        timeout: Duration,
    ) -> Result<AttemptResult, SinkError> {
        let client = self.client_for(auth, timeout)?;
        let response = client._post(self.status_route(sha), Some(request)).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(AttemptResult::Accepted);
        }

        let headers = response.headers().clone();
        let body = read_body(response).await?;
        Ok(AttemptResult::Rejected {
            status: status.as_u16(),
            body,
            headers,
        })
    }

    async fn delegate(
        &self,
        sha: &Sha,
        pr_number: Option<u64>,
        request: &StatusRequest,
        _timeout: Duration,
    ) -> Result<(), SinkError> {
        let body = DelegatedStatus {
            id: self.repo_id,
            vcs_type: &self.vcs_type,
            commit_ref: sha.as_str(),
            pr_number,
            payload: request,
        };
        let response = self.base._post("/vcs/statuses", Some(&body)).await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SinkError::Delegated(status.as_u16()))
        }
    }
}

/// Collects a raw response body into a string for rejection logging.
async fn read_body(
    response: http::Response<BoxBody<Bytes, octocrab::Error>>,
) -> Result<String, SinkError> {
    let collected = response
        .into_body()
        .collect()
        .await
        .map_err(|err| SinkError::Body(err.to_string()))?;
    Ok(String::from_utf8_lossy(&collected.to_bytes()).into_owned())
}
