pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::config::MailConfig;
use crate::database::models::{Appointment, Contact, JobApplication};

pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Sends staff notifications. Delivery is best-effort: failures are logged
/// and never reach the caller.
#[derive(Clone, Default)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
    admin_email: Option<String>,
    hr_email: Option<String>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, admin_email: Option<String>, hr_email: Option<String>) -> Self {
        Self { mailer: Some(mailer), admin_email, hr_email }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// SMTP notifications when `EMAIL_USER` is configured, otherwise disabled.
    pub fn from_config(config: &MailConfig) -> Self {
        match SmtpMailer::from_config(config) {
            Ok(Some(mailer)) => {
                info!(host = %config.host, "Mail notifications enabled");
                Self::new(Arc::new(mailer), config.admin_email.clone(), config.hr_email.clone())
            }
            Ok(None) => Self::disabled(),
            Err(e) => {
                error!(error = %e, "Mail transport could not be configured; notifications disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn contact_received(&self, contact: &Contact) {
        if let Some(to) = &self.admin_email {
            self.deliver(templates::contact_notification(to, contact)).await;
        }
    }

    pub async fn appointment_requested(&self, appointment: &Appointment) {
        if let Some(to) = &self.admin_email {
            self.deliver(templates::appointment_notification(to, appointment)).await;
        }
    }

    pub async fn application_received(&self, application: &JobApplication) {
        if let Some(to) = &self.hr_email {
            self.deliver(templates::application_notification(to, application)).await;
        }
    }

    async fn deliver(&self, mail: OutgoingMail) {
        let Some(mailer) = &self.mailer else { return };
        let subject = mail.subject.clone();
        match mailer.send(mail).await {
            Ok(()) => info!(subject = %subject, "Notification email sent"),
            Err(e) => error!(subject = %subject, error = %e, "Failed to send notification email"),
        }
    }
}
