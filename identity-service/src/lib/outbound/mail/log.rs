use async_trait::async_trait;

use crate::config::MailConfig;
use crate::domain::mail::MailError;
use crate::domain::mail::MailMessage;
use crate::domain::mail::Mailer;

/// Development transport that writes messages to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let to = message
            .to
            .iter()
            .map(|address| address.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        tracing::info!(
            from = %self.from,
            to = %to,
            subject = %message.subject,
            body_len = message.body.len(),
            "Mail send stub"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;

    fn mailer() -> LogMailer {
        LogMailer::new(&MailConfig {
            from: "noreply@example.com".to_string(),
            workers: 1,
            queue_capacity: 1,
        })
    }

    #[tokio::test]
    async fn test_requires_recipient() {
        let message = MailMessage {
            to: Vec::new(),
            subject: "Reset Password".to_string(),
            body: "body".to_string(),
        };

        assert_eq!(mailer().send(&message).await, Err(MailError::NoRecipients));
    }

    #[tokio::test]
    async fn test_accepts_addressed_message() {
        let message = MailMessage::new(
            EmailAddress::new("a@b.com".to_string()).unwrap(),
            "Reset Password",
            "body",
        );

        assert_eq!(mailer().send(&message).await, Ok(()));
    }
}
