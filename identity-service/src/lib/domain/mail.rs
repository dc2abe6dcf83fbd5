use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::models::EmailAddress;

/// Error for mail delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("Send email must specify at least one recipient")]
    NoRecipients,

    #[error("Mail delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    pub fn new(to: EmailAddress, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: vec![to],
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver `message`.
    ///
    /// # Errors
    /// * `NoRecipients` - Message has no recipient
    /// * `DeliveryFailed` - Transport rejected or failed to deliver the message
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Fire-and-forget submission of outbound mail.
///
/// Implementations must return immediately; delivery happens elsewhere and
/// its failures never reach the submitter.
pub trait MailQueue: Send + Sync + 'static {
    fn submit(&self, message: MailMessage);
}
