//! SMTP delivery through `lettre`.

use async_trait::async_trait;
use havsvakt_config::SmtpConfig;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::Notifier;
use crate::error::DeliveryError;
use crate::message::Notification;

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig, sender: &str) -> Result<Self, DeliveryError> {
        let sender: Mailbox = sender
            .parse()
            .map_err(|e| DeliveryError::Setup(format!("invalid sender {sender}: {e}")))?;

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        }
        .map_err(|e| DeliveryError::Setup(e.to_string()))?
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), DeliveryError> {
        let to: Mailbox = recipient.parse().map_err(|e| DeliveryError::InvalidAddress {
            recipient: recipient.to_string(),
            reason: format!("{e}"),
        })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| DeliveryError::transport(recipient, e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::transport(recipient, e))?;

        debug!("Mail accepted by relay for {recipient}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: Some("user".into()),
            password: Some("secret".into()),
            starttls: true,
        }
    }

    #[tokio::test]
    async fn builds_with_valid_sender() {
        assert!(SmtpNotifier::new(&relay(), "alerts@havsvakt.example").is_ok());
    }

    #[tokio::test]
    async fn rejects_invalid_sender() {
        assert!(matches!(
            SmtpNotifier::new(&relay(), "no at sign"),
            Err(DeliveryError::Setup(_))
        ));
    }
}
