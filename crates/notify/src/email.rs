//! SMTP email notifier via `lettre` with TLS support.
//!
//! Delivers status reports as HTML emails through an authenticated SMTP
//! server. Port 465 uses implicit TLS, every other port uses STARTTLS.

use crate::traits::{Notification, Notifier, NotifyError};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use zoo_core::config::EmailConfig;

/// Display name on every outgoing report.
pub const SENDER_NAME: &str = "Daily Zoo Bot";

/// Sends notifications as HTML emails via SMTP.
#[derive(Debug)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from the email section of the config.
    ///
    /// Sender, password and receiver must all be present; the sender
    /// address doubles as the SMTP username.
    pub fn from_config(config: &EmailConfig) -> Result<Self, NotifyError> {
        let (Some(sender), Some(password), Some(receiver)) = (
            config.sender.as_deref(),
            config.password.as_deref(),
            config.receiver.as_deref(),
        ) else {
            return Err(NotifyError::Config(
                "EMAIL_SENDER, EMAIL_PASSWORD and EMAIL_RECEIVER are required".to_string(),
            ));
        };

        let sender_address: Address = sender
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), sender_address);

        let to: Mailbox = receiver
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let builder = if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| NotifyError::Config(e.to_string()))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from, to })
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&notification.subject)
            .header(ContentType::TEXT_HTML)
            .body(notification.html_body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            subject = %notification.subject,
            "notification delivered"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            sender: Some("bot@example.com".to_string()),
            password: Some("app-password".to_string()),
            receiver: Some("owner@example.com".to_string()),
            ..EmailConfig::default()
        }
    }

    #[tokio::test]
    async fn from_config_valid() {
        let notifier = EmailNotifier::from_config(&config()).unwrap();
        assert_eq!(notifier.channel_name(), "email");
        assert_eq!(notifier.from.name.as_deref(), Some(SENDER_NAME));
        assert_eq!(notifier.from.email.to_string(), "bot@example.com");
        assert_eq!(notifier.to.email.to_string(), "owner@example.com");
    }

    #[tokio::test]
    async fn from_config_implicit_tls_port() {
        let cfg = EmailConfig {
            smtp_port: 465,
            ..config()
        };
        assert!(EmailNotifier::from_config(&cfg).is_ok());
    }

    #[test]
    fn from_config_missing_password() {
        let cfg = EmailConfig {
            password: None,
            ..config()
        };
        let err = EmailNotifier::from_config(&cfg).unwrap_err().to_string();
        assert!(err.contains("Configuration error"), "got: {err}");
    }

    #[test]
    fn from_config_invalid_sender() {
        let cfg = EmailConfig {
            sender: Some("not-an-email".to_string()),
            ..config()
        };
        assert!(EmailNotifier::from_config(&cfg).is_err());
    }

    #[test]
    fn from_config_invalid_receiver() {
        let cfg = EmailConfig {
            receiver: Some("nobody".to_string()),
            ..config()
        };
        assert!(EmailNotifier::from_config(&cfg).is_err());
    }
}
