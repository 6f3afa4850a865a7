//! Operator notifications
//!
//! Every accepted application is announced to a fixed operator mailbox.
//! Delivery is best-effort: one attempt, bounded by a timeout, and the
//! outcome only ever reaches the caller as a boolean.

mod render;
mod smtp;

pub use render::{html_body, moscow_timestamp, subject};
pub use smtp::SmtpMailer;

use crate::config::MailConfig;
use crate::error::NotificationError;
use async_trait::async_trait;
use landing_types::StoredSubmission;
use std::sync::Arc;
use std::time::Duration;

/// A composed notification, independent of the wire protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Something that can put an [`OutgoingMail`] on the wire
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Transport name for logs
    fn name(&self) -> &'static str;

    /// Deliver one message
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError>;
}

/// Transport used when mail is switched off or could not be configured
#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl MailTransport for DisabledMailer {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, _mail: OutgoingMail) -> Result<(), NotificationError> {
        Err(NotificationError::Disabled)
    }
}

/// Composes and dispatches the operator email for a stored submission
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    from: String,
    to: String,
    timeout: Duration,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("transport", &self.transport.name())
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
        to: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            from: from.into(),
            to: to.into(),
            timeout,
        }
    }

    /// Build the notifier described by configuration.
    ///
    /// A transport that cannot be built is logged and replaced by
    /// [`DisabledMailer`]; submissions are still accepted.
    pub fn from_config(config: &MailConfig) -> Self {
        let transport: Arc<dyn MailTransport> = if !config.enabled {
            tracing::info!("Mail notifications disabled by configuration");
            Arc::new(DisabledMailer)
        } else {
            match SmtpMailer::new(config) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        host = %config.host,
                        "SMTP transport unavailable, notifications disabled"
                    );
                    Arc::new(DisabledMailer)
                }
            }
        };

        Self::new(transport, &config.from, &config.to, config.timeout())
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Compose the operator email for a submission
    pub fn compose(
        &self,
        submission: &StoredSubmission,
    ) -> Result<OutgoingMail, NotificationError> {
        Ok(OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: subject(submission),
            html_body: html_body(submission)?,
        })
    }

    /// One bounded delivery attempt
    pub async fn deliver(&self, submission: &StoredSubmission) -> Result<(), NotificationError> {
        let mail = self.compose(submission)?;
        match tokio::time::timeout(self.timeout, self.transport.send(mail)).await {
            Ok(result) => result,
            Err(_) => Err(NotificationError::Timeout(self.timeout)),
        }
    }

    /// Deliver and report whether the operator was notified.
    pub async fn notify(&self, submission: &StoredSubmission) -> bool {
        match self.deliver(submission).await {
            Ok(()) => {
                tracing::info!(
                    contact_id = %submission.id,
                    transport = self.transport.name(),
                    "Notification sent"
                );
                true
            }
            Err(NotificationError::Disabled) => {
                tracing::debug!(contact_id = %submission.id, "Notification skipped, mail disabled");
                false
            }
            Err(e) => {
                tracing::warn!(contact_id = %submission.id, error = %e, "Notification failed");
                false
            }
        }
    }
}
