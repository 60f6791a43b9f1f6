//! Outgoing mail.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// Error returned when a digest could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The sender or recipient is not a valid address.
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    /// The SMTP exchange failed.
    #[error("failed to send message: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Something that delivers an HTML message.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Sends `html_body` under `subject`.
    async fn send(
        &self,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError>;
}

/// Sends mail through an SMTP relay with STARTTLS.
#[derive(Clone, Debug)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Creates a mailer for the given relay.
    #[inline]
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Builds the message without sending it.
    pub fn build_message(
        &self,
        subject: &str,
        html_body: &str,
    ) -> Result<Message, MailError> {
        let from: Mailbox = self.config.username.parse()?;
        let to: Mailbox = self.config.recipient.parse()?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_owned())?;
        Ok(message)
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(
        &self,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        let message = self.build_message(subject, html_body)?;

        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );
        let mailer =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                &self.config.host,
            )?
            .port(self.config.port)
            .credentials(creds)
            .build();

        mailer.send(message).await?;
        info!(to = %self.config.recipient, subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(recipient: &str) -> SmtpMailer {
        SmtpMailer::new(SmtpConfig {
            host: "smtp.example.com".to_owned(),
            port: 587,
            username: "bot@example.com".to_owned(),
            password: "secret".to_owned(),
            recipient: recipient.to_owned(),
        })
    }

    #[test]
    fn test_build_message() {
        let message = mailer("me@example.com")
            .build_message("Daily Updates", "<p>No news available.</p>")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: Daily Updates"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(raw.contains("<p>No news available.</p>"));
    }

    #[test]
    fn test_invalid_recipient() {
        let err = mailer("not an address")
            .build_message("Daily Updates", "<p></p>")
            .unwrap_err();
        assert!(matches!(err, MailError::Address(_)));
    }
}
