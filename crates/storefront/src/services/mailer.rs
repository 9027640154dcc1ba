//! Contact form delivery.
//!
//! Real email delivery is out of scope: [`MockMailer`] waits for a simulated
//! latency, logs the inquiry and acknowledges it. Whether a mail service key
//! is configured only changes the acknowledgement shown to the customer.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::intake::ContactSubmission;

/// Errors that can occur when delivering a contact inquiry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    /// The delivery service could not be reached.
    #[error("Mail service unavailable: {0}")]
    Unavailable(String),

    /// The delivery service refused the message.
    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// How an accepted inquiry was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to a configured mail service.
    Sent,
    /// Accepted without a mail service; only logged.
    Simulated,
}

/// Whether a mail service key is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailerMode {
    Configured,
    #[default]
    Unconfigured,
}

/// Delivers contact inquiries.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one inquiry.
    ///
    /// # Errors
    ///
    /// Returns `MailError` if the inquiry could not be delivered.
    async fn send(&self, submission: &ContactSubmission) -> Result<Delivery, MailError>;
}

/// Mailer that only simulates delivery.
#[derive(Debug, Clone)]
pub struct MockMailer {
    latency: Duration,
    mode: MailerMode,
}

impl MockMailer {
    /// Create a mock mailer with the given simulated latency.
    #[must_use]
    pub const fn new(latency: Duration, mode: MailerMode) -> Self {
        Self { latency, mode }
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, submission: &ContactSubmission) -> Result<Delivery, MailError> {
        tokio::time::sleep(self.latency).await;

        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            has_phone = submission.phone.is_some(),
            mode = ?self.mode,
            "Contact inquiry accepted"
        );

        Ok(match self.mode {
            MailerMode::Configured => Delivery::Sent,
            MailerMode::Unconfigured => Delivery::Simulated,
        })
    }
}
