//! Core domain types for the status publisher.
//!
//! This module contains all the fundamental types used throughout the crate,
//! designed to encode invariants via the type system.

pub mod build;
pub mod ids;
pub mod payload;
pub mod secret;

// Re-export commonly used types at the module level
pub use build::{BuildState, ExternalStatus, UnknownBuildState};
pub use ids::{BuildId, CredentialLabel, InstallationId, Sha, VcsId};
pub use payload::{
    Build, Commit, Credential, Params, PullRequestRef, Repository, RequestRef, StatusPayload,
    GITHUB_VCS_TYPE, LEGACY_TOKEN_LABEL,
};
pub use secret::Secret;
