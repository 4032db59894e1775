//! The ordered queue of credentials to attempt.
//!
//! Consumption is destructive and strictly front-to-back: the queue never
//! re-grows during an execution, so the orchestrator's loop is guaranteed to
//! terminate after at most one attempt per supplied credential.

use std::collections::VecDeque;

use crate::types::{Credential, StatusPayload};

/// FIFO queue of (label, secret) pairs, in payload order.
#[derive(Debug, Clone, Default)]
pub struct CredentialQueue {
    queue: VecDeque<Credential>,
}

impl CredentialQueue {
    /// Builds the queue from an ordered list of credentials.
    pub fn new(credentials: Vec<Credential>) -> Self {
        CredentialQueue {
            queue: credentials.into(),
        }
    }

    /// Builds the queue from the task payload: the ordered `tokens` mapping,
    /// or a single synthesized legacy entry, or empty.
    pub fn from_payload(payload: &StatusPayload) -> Self {
        Self::new(payload.credentials())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Removes and returns the front credential, if any.
    pub fn take_next(&mut self) -> Option<Credential> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(labels: &[&str]) -> Vec<Credential> {
        labels
            .iter()
            .map(|label| Credential::new(*label, format!("tok-{label}")))
            .collect()
    }

    #[test]
    fn drains_front_to_back() {
        let mut queue = CredentialQueue::new(creds(&["first", "second", "third"]));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.take_next().unwrap().label.as_str(), "first");
        assert_eq!(queue.take_next().unwrap().label.as_str(), "second");
        assert_eq!(queue.take_next().unwrap().label.as_str(), "third");
        assert!(queue.is_empty());
        assert!(queue.take_next().is_none());
    }

    #[test]
    fn empty_queue_reports_empty() {
        let mut queue = CredentialQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.take_next().is_none());
    }
}
