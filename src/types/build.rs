//! Build lifecycle states and their external status vocabulary.
//!
//! The upstream job system tracks builds through a richer lifecycle than
//! GitHub's commit-status API exposes. Both vocabularies are closed enums, so
//! the state-to-status and status-to-description mappings are total by
//! construction: an unmapped case is a compile error, not a silently wrong
//! status on someone's commit.
//!
//! Unknown state *strings* from the payload fail loudly at parse time instead
//! of defaulting; see [`BuildState::from_str`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Internal build lifecycle state, as supplied by the upstream job payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Created,
    Queued,
    Started,
    Passed,
    Failed,
    Errored,
    Canceled,
}

impl BuildState {
    /// Maps this build state onto GitHub's commit-status vocabulary.
    pub fn external_status(self) -> ExternalStatus {
        match self {
            BuildState::Created | BuildState::Queued | BuildState::Started => {
                ExternalStatus::Pending
            }
            BuildState::Passed => ExternalStatus::Success,
            BuildState::Failed => ExternalStatus::Failure,
            BuildState::Errored | BuildState::Canceled => ExternalStatus::Error,
        }
    }

    /// Returns the wire string for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildState::Created => "created",
            BuildState::Queued => "queued",
            BuildState::Started => "started",
            BuildState::Passed => "passed",
            BuildState::Failed => "failed",
            BuildState::Errored => "errored",
            BuildState::Canceled => "canceled",
        }
    }

    /// All lifecycle states, in lifecycle order.
    pub const ALL: [BuildState; 7] = [
        BuildState::Created,
        BuildState::Queued,
        BuildState::Started,
        BuildState::Passed,
        BuildState::Failed,
        BuildState::Errored,
        BuildState::Canceled,
    ];
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a payload carries a build state this crate does not know.
///
/// Publishing a guessed status would be worse than failing the task, so this
/// is never papered over with a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build state {0:?}")]
pub struct UnknownBuildState(pub String);

impl FromStr for BuildState {
    type Err = UnknownBuildState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(BuildState::Created),
            "queued" => Ok(BuildState::Queued),
            "started" => Ok(BuildState::Started),
            "passed" => Ok(BuildState::Passed),
            "failed" => Ok(BuildState::Failed),
            "errored" => Ok(BuildState::Errored),
            "canceled" => Ok(BuildState::Canceled),
            other => Err(UnknownBuildState(other.to_string())),
        }
    }
}

/// GitHub's commit-status state vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalStatus {
    Pending,
    Success,
    Failure,
    Error,
}

impl ExternalStatus {
    /// Returns the status string GitHub's API expects.
    pub fn as_api_str(self) -> &'static str {
        match self {
            ExternalStatus::Pending => "pending",
            ExternalStatus::Success => "success",
            ExternalStatus::Failure => "failure",
            ExternalStatus::Error => "error",
        }
    }

    /// Human-readable description shown next to the status on GitHub.
    pub fn description(self) -> &'static str {
        match self {
            ExternalStatus::Pending => "The Travis CI build is in progress",
            ExternalStatus::Success => "The Travis CI build passed",
            ExternalStatus::Failure => "The Travis CI build failed",
            ExternalStatus::Error => "The Travis CI build could not complete due to an error",
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}
