//! Fire-and-forget delivery of job status reports.
//!
//! [`StatusMailer::send`] never fails: missing credentials and transport
//! errors are logged and reported back as a [`DeliveryOutcome`] so a mail
//! problem cannot change the outcome of the job itself.

use zoo_core::config::EmailConfig;

use crate::email::EmailNotifier;
use crate::traits::{Notification, Notifier};

/// What happened to one status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Email is not configured; nothing was attempted.
    Skipped,
    Failed(String),
}

/// Sends status reports to the single configured recipient.
pub struct StatusMailer {
    channel: Option<Box<dyn Notifier>>,
}

impl StatusMailer {
    pub fn new(channel: Box<dyn Notifier>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// A mailer that skips every report.
    pub fn disabled() -> Self {
        Self { channel: None }
    }

    /// Build the SMTP channel when sender, password and receiver are set;
    /// otherwise the mailer is disabled.
    pub fn from_config(config: &EmailConfig) -> Self {
        if !config.is_configured() {
            tracing::warn!("Email secrets missing, status emails disabled");
            return Self::disabled();
        }

        match EmailNotifier::from_config(config) {
            Ok(notifier) => Self::new(Box::new(notifier)),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid email settings, status emails disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    pub async fn send(&self, subject: &str, html_body: &str) -> DeliveryOutcome {
        let Some(channel) = &self.channel else {
            tracing::warn!(subject, "Email secrets missing. Skipping email.");
            return DeliveryOutcome::Skipped;
        };

        let notification = Notification {
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        match channel.send(&notification).await {
            Ok(()) => {
                tracing::info!(channel = channel.channel_name(), subject, "Status email sent");
                DeliveryOutcome::Sent
            }
            Err(e) => {
                tracing::error!(
                    channel = channel.channel_name(),
                    subject,
                    error = %e,
                    "Failed to send status email"
                );
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
