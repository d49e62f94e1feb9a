//! Mock mailer for testing
//!
//! Records outgoing messages in memory and can be configured to fail, so
//! tests can exercise both delivery outcomes without a network.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

use super::OutgoingEmail;

/// In-memory mail recorder
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl MockMailer {
    /// Create a mock mailer that accepts every message
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer that rejects every message
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Number of messages accepted so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Recipient of the most recently accepted message
    pub fn last_recipient(&self) -> Option<String> {
        self.sent
            .lock()
            .ok()
            .and_then(|s| s.last().map(|e| e.to.clone()))
    }

    /// Subject of the most recently accepted message
    pub fn last_subject(&self) -> Option<String> {
        self.sent
            .lock()
            .ok()
            .and_then(|s| s.last().map(|e| e.subject.clone()))
    }

    pub(super) async fn send(&self, email: &OutgoingEmail) -> Result<String> {
        if self.fail {
            return Err(Error::Mail("mock mailer configured to fail".into()));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| Error::Mail("mock mailer lock poisoned".into()))?;
        sent.push(email.clone());
        Ok(format!("mock-{}", sent.len()))
    }
}
