//! The inbound task payload.
//!
//! Everything the publisher needs for one execution arrives in a single
//! payload from the job system: the build, its repository, the commit (or
//! pull-request head) to attach the status to, and the credentials to try.
//!
//! The `tokens` parameter is an ordered mapping of label to secret; attempt
//! order is the order the labels appear in the payload, so it deserializes
//! through a map visitor into a `Vec` instead of a hash map.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use super::build::BuildState;
use super::ids::{BuildId, CredentialLabel, InstallationId, Sha, VcsId};
use super::secret::Secret;

/// Repository type string for which the GitHub paths apply; anything else is
/// delegated to the provider-agnostic sink call.
pub const GITHUB_VCS_TYPE: &str = "GithubRepository";

/// Label synthesized when the payload carries only the single legacy `token`
/// field instead of an ordered `tokens` mapping.
pub const LEGACY_TOKEN_LABEL: &str = "<legacy format>";

/// One (label, secret) pair from the task params.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub label: CredentialLabel,
    pub secret: Secret,
}

impl Credential {
    pub fn new(label: impl Into<CredentialLabel>, secret: impl Into<Secret>) -> Self {
        Credential {
            label: label.into(),
            secret: secret.into(),
        }
    }
}

/// The build this notification is about.
#[derive(Debug, Clone, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub state: BuildState,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// The repository the commit lives in.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub vcs_id: VcsId,
    pub vcs_type: String,
    #[serde(default)]
    pub vcs_slug: Option<String>,
    pub slug: String,
}

impl Repository {
    /// True when the repository is hosted by the provider this crate's GitHub
    /// paths target.
    pub fn is_github(&self) -> bool {
        self.vcs_type == GITHUB_VCS_TYPE
    }

    /// The slug used in status target URLs, preferring the provider's own.
    pub fn display_slug(&self) -> &str {
        self.vcs_slug.as_deref().unwrap_or(&self.slug)
    }
}

/// The request that triggered the build; carries the pull-request head commit
/// when the trigger was a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestRef {
    #[serde(default)]
    pub head_commit: Option<Sha>,
}

/// Pull-request metadata, present only for pull-request-triggered builds.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
}

/// The pushed commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: Sha,
}

/// Task parameters: credentials and the optional app installation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    #[serde(default, deserialize_with = "ordered_tokens")]
    pub tokens: Option<Vec<Credential>>,
    #[serde(default)]
    pub token: Option<Secret>,
    #[serde(default)]
    pub installation: Option<InstallationId>,
}

/// The full inbound payload for one status-publishing task execution.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    pub build: Build,
    pub repository: Repository,
    #[serde(default)]
    pub request: Option<RequestRef>,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    pub commit: Commit,
    #[serde(default)]
    pub params: Params,
}

impl StatusPayload {
    /// True when the build was triggered by a pull request rather than a
    /// branch push.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// The commit the status attaches to: the pull-request head for PR
    /// builds, the pushed commit otherwise.
    pub fn sha(&self) -> &Sha {
        if self.is_pull_request() {
            if let Some(head) = self.request.as_ref().and_then(|r| r.head_commit.as_ref()) {
                return head;
            }
        }
        &self.commit.sha
    }

    /// The pull-request number, for PR-triggered builds.
    pub fn pull_request_number(&self) -> Option<u64> {
        self.pull_request.as_ref().map(|pr| pr.number)
    }

    /// Credentials to attempt, front of the vec first.
    ///
    /// Falls back to a single synthesized entry when only the legacy `token`
    /// field is present; empty when neither is supplied.
    pub fn credentials(&self) -> Vec<Credential> {
        if let Some(tokens) = &self.params.tokens {
            return tokens.clone();
        }
        self.params
            .token
            .as_ref()
            .map(|token| vec![Credential::new(LEGACY_TOKEN_LABEL, token.clone())])
            .unwrap_or_default()
    }
}

/// Deserializes the `tokens` object preserving the order its entries appear
/// in the payload.
fn ordered_tokens<'de, D>(deserializer: D) -> Result<Option<Vec<Credential>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Entries;

    impl<'de> Visitor<'de> for Entries {
        type Value = Vec<Credential>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of credential labels to secrets")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, secret)) = map.next_entry::<String, String>()? {
                out.push(Credential::new(label, secret));
            }
            Ok(out)
        }
    }

    struct MaybeEntries;

    impl<'de> Visitor<'de> for MaybeEntries {
        type Value = Option<Vec<Credential>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an optional map of credential labels to secrets")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_map(Entries).map(Some)
        }
    }

    deserializer.deserialize_option(MaybeEntries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> StatusPayload {
        serde_json::from_value(json).unwrap()
    }

    fn base_payload() -> serde_json::Value {
        serde_json::json!({
            "build": { "id": 123, "state": "passed", "finished_at": null },
            "repository": {
                "vcs_id": 9,
                "vcs_type": "GithubRepository",
                "vcs_slug": "acme/widget",
                "slug": "acme/widget"
            },
            "commit": { "sha": "a".repeat(40) },
            "params": {}
        })
    }

    #[test]
    fn tokens_preserve_payload_order() {
        let mut json = base_payload();
        json["params"] = serde_json::json!({
            "tokens": { "zed": "tok-z", "alice": "tok-a", "mid": "tok-m" }
        });
        let creds = payload(json).credentials();
        let labels: Vec<_> = creds.iter().map(|c| c.label.as_str().to_string()).collect();
        assert_eq!(labels, ["zed", "alice", "mid"]);
    }

    #[test]
    fn legacy_token_synthesizes_single_credential() {
        let mut json = base_payload();
        json["params"] = serde_json::json!({ "token": "ghp_legacy" });
        let creds = payload(json).credentials();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].label.as_str(), LEGACY_TOKEN_LABEL);
        assert_eq!(creds[0].secret.expose(), "ghp_legacy");
    }

    #[test]
    fn no_credentials_yields_empty_queue_source() {
        assert!(payload(base_payload()).credentials().is_empty());
    }

    #[test]
    fn pull_request_build_uses_request_head_commit() {
        let mut json = base_payload();
        json["pull_request"] = serde_json::json!({ "number": 42 });
        json["request"] = serde_json::json!({ "head_commit": "b".repeat(40) });
        let p = payload(json);
        assert!(p.is_pull_request());
        assert_eq!(p.pull_request_number(), Some(42));
        assert_eq!(p.sha().as_str(), "b".repeat(40));
    }

    #[test]
    fn push_build_uses_commit_sha() {
        let p = payload(base_payload());
        assert!(!p.is_pull_request());
        assert_eq!(p.sha().as_str(), "a".repeat(40));
    }

    #[test]
    fn non_github_repository_is_detected() {
        let mut json = base_payload();
        json["repository"]["vcs_type"] = "BitbucketRepository".into();
        assert!(!payload(json).repository.is_github());
    }
}
