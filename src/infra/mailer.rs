//! Outbound email.
//!
//! [`SmtpMailer`] delivers through an SMTP relay with `lettre`. When SMTP is
//! not fully configured, [`LogMailer`] records the message in the log
//! instead of sending it.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::{SmtpSettings, TEMPORARY_PASSWORD_SUBJECT};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Implicit-TLS SMTP port; every other port negotiates STARTTLS.
const SMTPS_PORT: u16 = 465;

/// Email message payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Message carrying a freshly issued temporary password
    pub fn temporary_password(to: &str, full_name: &str, temporary_password: &str) -> Self {
        Self::new(
            to,
            TEMPORARY_PASSWORD_SUBJECT,
            format!(
                "Hello {},\n\n\
                 A temporary password has been generated for your account.\n\n\
                 Temporary password: {}\n\n\
                 Please sign in and change it immediately.\n",
                full_name, temporary_password
            ),
        )
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message. Failures surface as `AppError::Delivery`.
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// SMTP delivery via `lettre`
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(settings: &SmtpSettings) -> AppResult<Self> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let builder = if settings.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| AppError::internal(format!("Invalid SMTP relay: {}", e)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password().to_string(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::Delivery(format!("Invalid recipient {}: {}", message.to, e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| AppError::Delivery(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Delivery(e.to_string()))?;

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Development mailer: logs instead of sending
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(to = %message.to, subject = %message.subject, "Email (not sent)");
        Ok(())
    }
}

/// Pick the mailer for the given settings.
pub fn from_settings(smtp: Option<&SmtpSettings>) -> AppResult<Arc<dyn Mailer>> {
    match smtp {
        Some(settings) => Ok(Arc::new(SmtpMailer::new(settings)?)),
        None => Ok(Arc::new(LogMailer)),
    }
}
