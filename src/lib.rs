//! Status Relay - publishes build outcomes to GitHub's commit-status API,
//! failing over across candidate credentials.
//!
//! This library is one unit of work inside a larger job system: the caller
//! deserializes a task payload, builds a repository-scoped sink, and runs
//! [`publisher::StatusPublisher::process`] to completion.

pub mod github;
pub mod publisher;
pub mod status;
pub mod types;
