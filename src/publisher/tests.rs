//! Edge-case tests for the publishing orchestrator.
//!
//! These drive `StatusPublisher` against a scripted sink and assert the
//! failover contract: attempt counts, queue consumption, path exclusivity,
//! and which outcomes surface as hard failures.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use http::HeaderMap;

use crate::github::{AttemptResult, AuthMode, SinkError, StatusSink};
use crate::status::StatusRequest;
use crate::types::{Sha, StatusPayload, LEGACY_TOKEN_LABEL};

use super::outcome::{DeliveredVia, Delivery, PublishError};
use super::task::{PublisherConfig, StatusPublisher};

// ─── Scripted Sink ───

/// One scripted response for the next publish call.
enum Scripted {
    Accept,
    Reject(u16),
    RejectWithHeaders(u16, HeaderMap),
    Fail,
}

/// Which authentication a publish call arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SeenAuth {
    Installation(u64),
    Token(String),
}

struct ScriptedSink {
    responses: Mutex<VecDeque<Scripted>>,
    publishes: Mutex<Vec<SeenAuth>>,
    delegations: Mutex<usize>,
}

impl ScriptedSink {
    fn new(responses: Vec<Scripted>) -> Self {
        ScriptedSink {
            responses: Mutex::new(responses.into()),
            publishes: Mutex::new(Vec::new()),
            delegations: Mutex::new(0),
        }
    }

    fn seen(&self) -> Vec<SeenAuth> {
        self.publishes.lock().unwrap().clone()
    }

    fn delegations(&self) -> usize {
        *self.delegations.lock().unwrap()
    }
}

impl StatusSink for ScriptedSink {
    fn name(&self) -> &str {
        "scripted_app"
    }

    async fn publish(
        &self,
        auth: &AuthMode,
        _sha: &Sha,
        _request: &StatusRequest,
        _timeout: Duration,
    ) -> Result<AttemptResult, SinkError> {
        self.publishes.lock().unwrap().push(match auth {
            AuthMode::Installation(id) => SeenAuth::Installation(id.0),
            AuthMode::Token(secret) => SeenAuth::Token(secret.expose().to_string()),
        });
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("sink called more times than scripted");
        match next {
            Scripted::Accept => Ok(AttemptResult::Accepted),
            Scripted::Reject(status) => Ok(AttemptResult::Rejected {
                status,
                body: "{\"message\":\"scripted\"}".to_string(),
                headers: HeaderMap::new(),
            }),
            Scripted::RejectWithHeaders(status, headers) => Ok(AttemptResult::Rejected {
                status,
                body: "{\"message\":\"scripted\"}".to_string(),
                headers,
            }),
            Scripted::Fail => Err(SinkError::Body("scripted transport failure".to_string())),
        }
    }

    async fn delegate(
        &self,
        _sha: &Sha,
        _pr_number: Option<u64>,
        _request: &StatusRequest,
        _timeout: Duration,
    ) -> Result<(), SinkError> {
        *self.delegations.lock().unwrap() += 1;
        Ok(())
    }
}

// ─── Payload Helpers ───

fn payload_json() -> serde_json::Value {
    serde_json::json!({
        "build": { "id": 123, "state": "passed", "finished_at": null },
        "repository": {
            "vcs_id": 9,
            "vcs_type": "GithubRepository",
            "vcs_slug": "acme/widget",
            "slug": "acme/widget"
        },
        "commit": { "sha": "c".repeat(40) },
        "params": {}
    })
}

fn payload_with_params(params: serde_json::Value) -> StatusPayload {
    let mut json = payload_json();
    json["params"] = params;
    serde_json::from_value(json).unwrap()
}

fn token_params(labels: &[&str]) -> serde_json::Value {
    let mut tokens = serde_json::Map::new();
    for label in labels {
        tokens.insert(label.to_string(), format!("tok-{label}").into());
    }
    serde_json::json!({ "tokens": tokens })
}

fn publisher(sink: &ScriptedSink) -> StatusPublisher<&ScriptedSink> {
    StatusPublisher::new(
        sink,
        PublisherConfig {
            http_host: "https://travis-ci.example.com".to_string(),
        },
    )
}

const TIMEOUT: Duration = Duration::from_secs(10);

// The trait is implemented on &ScriptedSink so tests can keep inspecting the
// sink after handing it to the publisher.
impl StatusSink for &ScriptedSink {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn publish(
        &self,
        auth: &AuthMode,
        sha: &Sha,
        request: &StatusRequest,
        timeout: Duration,
    ) -> Result<AttemptResult, SinkError> {
        (**self).publish(auth, sha, request, timeout).await
    }

    async fn delegate(
        &self,
        sha: &Sha,
        pr_number: Option<u64>,
        request: &StatusRequest,
        timeout: Duration,
    ) -> Result<(), SinkError> {
        (**self).delegate(sha, pr_number, request, timeout).await
    }
}

// ─── Legacy Loop ───

#[tokio::test]
async fn failover_stops_at_first_success() {
    // First two credentials rejected with 403, third succeeds; the last two
    // must never be consumed.
    let sink = ScriptedSink::new(vec![
        Scripted::Reject(403),
        Scripted::Reject(403),
        Scripted::Accept,
    ]);
    let payload = payload_with_params(token_params(&["u1", "u2", "u3", "u4", "u5"]));

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(
        delivery,
        Delivery::Delivered(DeliveredVia::UserToken("u3".into()))
    );
    assert_eq!(
        sink.seen(),
        vec![
            SeenAuth::Token("tok-u1".to_string()),
            SeenAuth::Token("tok-u2".to_string()),
            SeenAuth::Token("tok-u3".to_string()),
        ]
    );
}

#[tokio::test]
async fn commit_status_limit_stops_after_one_attempt() {
    let sink = ScriptedSink::new(vec![Scripted::Reject(422)]);
    let payload = payload_with_params(token_params(&["u1", "u2", "u3"]));

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(delivery, Delivery::CommitLimitReached);
    assert_eq!(sink.seen().len(), 1);
}

#[tokio::test]
async fn unrecognized_status_propagates_as_hard_failure() {
    let sink = ScriptedSink::new(vec![Scripted::Reject(500)]);
    let payload = payload_with_params(token_params(&["u1", "u2"]));

    let err = publisher(&sink)
        .process(&payload, TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::UnexpectedStatus { status: 500, .. }
    ));
    assert_eq!(sink.seen().len(), 1);
}

#[tokio::test]
async fn exhaustion_is_a_soft_failure() {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", "60".parse().unwrap());
    headers.insert("x-ratelimit-remaining", "0".parse().unwrap());
    let sink = ScriptedSink::new(vec![
        Scripted::RejectWithHeaders(403, headers),
        Scripted::Reject(404),
    ]);
    let payload = payload_with_params(token_params(&["u1", "u2"]));

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(
        delivery,
        Delivery::Exhausted {
            tried: vec!["u1".into(), "u2".into()]
        }
    );
    assert_eq!(sink.seen().len(), 2);
}

#[tokio::test]
async fn legacy_token_field_is_attempted_under_placeholder_label() {
    let sink = ScriptedSink::new(vec![Scripted::Accept]);
    let payload = payload_with_params(serde_json::json!({ "token": "ghp_only" }));

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(
        delivery,
        Delivery::Delivered(DeliveredVia::UserToken(LEGACY_TOKEN_LABEL.into()))
    );
    assert_eq!(sink.seen(), vec![SeenAuth::Token("ghp_only".to_string())]);
}

#[tokio::test]
async fn empty_queue_finishes_silently_without_calls() {
    let sink = ScriptedSink::new(vec![]);
    let payload = payload_with_params(serde_json::json!({}));

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(delivery, Delivery::Exhausted { tried: vec![] });
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn transport_failure_propagates() {
    let sink = ScriptedSink::new(vec![Scripted::Fail]);
    let payload = payload_with_params(token_params(&["u1", "u2"]));

    let err = publisher(&sink)
        .process(&payload, TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Transport(_)));
    assert_eq!(sink.seen().len(), 1);
}

// ─── App-Installation Path ───

#[tokio::test]
async fn app_success_never_touches_the_credential_queue() {
    let sink = ScriptedSink::new(vec![Scripted::Accept]);
    let mut params = token_params(&["u1", "u2"]);
    params["installation"] = 555.into();
    let payload = payload_with_params(params);

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(delivery, Delivery::Delivered(DeliveredVia::Installation));
    assert_eq!(sink.seen(), vec![SeenAuth::Installation(555)]);
}

#[tokio::test]
async fn app_rejection_finishes_without_fallback() {
    let sink = ScriptedSink::new(vec![Scripted::Reject(404)]);
    let mut params = token_params(&["u1", "u2"]);
    params["installation"] = 555.into();
    let payload = payload_with_params(params);

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(delivery, Delivery::Rejected { status: 404 });
    assert_eq!(sink.seen(), vec![SeenAuth::Installation(555)]);
}

#[tokio::test]
async fn app_unexpected_status_is_a_hard_failure() {
    let sink = ScriptedSink::new(vec![Scripted::Reject(502)]);
    let payload = payload_with_params(serde_json::json!({ "installation": 555 }));

    let err = publisher(&sink)
        .process(&payload, TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::UnexpectedStatus { status: 502, .. }
    ));
}

// ─── Provider Delegation ───

#[tokio::test]
async fn non_github_repository_is_delegated_whole() {
    let sink = ScriptedSink::new(vec![]);
    let mut json = payload_json();
    json["repository"]["vcs_type"] = "BitbucketRepository".into();
    json["params"] = token_params(&["u1"]);
    let payload: StatusPayload = serde_json::from_value(json).unwrap();

    let delivery = publisher(&sink).process(&payload, TIMEOUT).await.unwrap();

    assert_eq!(delivery, Delivery::Delegated);
    assert_eq!(sink.delegations(), 1);
    assert!(sink.seen().is_empty());
}
