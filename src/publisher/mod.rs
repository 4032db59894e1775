//! The status-publishing task: credential failover and outcome handling.
//!
//! Entry point is [`StatusPublisher::process`], which runs one task payload
//! to completion against an injected [`crate::github::StatusSink`].

pub mod credentials;
pub mod outcome;
pub mod task;

#[cfg(test)]
mod tests;

pub use credentials::CredentialQueue;
pub use outcome::{DeliveredVia, Delivery, PublishError, PublishOutcome};
pub use task::{PublisherConfig, StatusPublisher};
