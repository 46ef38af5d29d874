//! Status email delivery for the ingestion job.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - SMTP email notifier built on `lettre`
//! - Minijinja rendering of the started/succeeded/failed reports
//! - `StatusMailer`, which never lets a delivery problem escape

pub mod email;
pub mod mailer;
pub mod templating;
pub mod traits;

pub use mailer::{DeliveryOutcome, StatusMailer};
pub use templating::{escape_html, FailedContext, StartedContext, SucceededContext, TemplateRenderer};
pub use traits::{Notification, Notifier, NotifyError};
