//! The outbound commit-status body.
//!
//! A [`StatusRequest`] is everything GitHub's create-status endpoint needs:
//! the state, a human description, a deterministic link back to the build,
//! and the context string that names the status line on the commit.

use serde::Serialize;

use crate::types::{BuildId, BuildState, ExternalStatus, Repository};

/// Context prefix for all statuses published by this crate.
const CONTEXT_PREFIX: &str = "continuous-integration/travis-ci";

/// Tracking parameters appended to every target URL, identifying this
/// notification channel.
const UTM_QUERY: &str = "utm_source=github_status&utm_medium=notification";

/// The JSON body of a create-status call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRequest {
    pub state: ExternalStatus,
    pub description: &'static str,
    pub target_url: String,
    pub context: String,
}

impl StatusRequest {
    /// Builds the status body for one build.
    ///
    /// Deterministic for a given (host, repository, build) tuple: the same
    /// inputs always produce the same URL and context.
    pub fn new(
        http_host: &str,
        repository: &Repository,
        build_id: BuildId,
        build_state: BuildState,
        is_pull_request: bool,
    ) -> Self {
        let state = build_state.external_status();
        StatusRequest {
            state,
            description: state.description(),
            target_url: target_url(http_host, repository, build_id),
            context: context(is_pull_request),
        }
    }
}

/// The status context: `continuous-integration/travis-ci/pr` for
/// pull-request-triggered builds, `.../push` for branch pushes.
pub fn context(is_pull_request: bool) -> String {
    let build_type = if is_pull_request { "pr" } else { "push" };
    format!("{CONTEXT_PREFIX}/{build_type}")
}

/// The link back to the build, with tracking parameters appended.
pub fn target_url(http_host: &str, repository: &Repository, build_id: BuildId) -> String {
    format!(
        "{}/{}/{}/builds/{}?{}",
        http_host.trim_end_matches('/'),
        vcs_prefix(&repository.vcs_type),
        repository.display_slug(),
        build_id,
        UTM_QUERY,
    )
}

/// Derives the URL path prefix from the repository's vcs type:
/// `"GithubRepository"` becomes `"github"`.
fn vcs_prefix(vcs_type: &str) -> String {
    vcs_type
        .strip_suffix("Repository")
        .unwrap_or(vcs_type)
        .to_lowercase()
}
