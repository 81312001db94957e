//! @ai:module:intent Recording mailer for dry runs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockMailer

use crate::delivery::client::{DeliveryError, DeliveryReceipt, EmailMessage, Mailer};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// @ai:intent Mailer that keeps every message it is asked to send
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<EmailMessage>>,
    attempts: AtomicUsize,
    failure: Option<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer that rejects every message with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Calls to `send`, accepted or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.failure {
            return Err(DeliveryError::Provider {
                status: 503,
                body: reason.clone(),
            });
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Rejected("mock mailbox poisoned".to_string()))?;
        sent.push(message.clone());

        Ok(DeliveryReceipt {
            id: format!("mock-{}", sent.len()),
            accepted_at: Utc::now(),
        })
    }
}
