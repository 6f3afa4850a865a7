//! SMTP delivery through lettre

use super::{MailTransport, OutgoingMail};
use crate::config::MailConfig;
use crate::error::NotificationError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Pooled async SMTP transport
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    ///
    /// `secure` selects implicit TLS; otherwise STARTTLS is used when the
    /// server offers it.
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let transport_err =
            |e: lettre::transport::smtp::Error| NotificationError::Transport(e.to_string());

        let mut builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(transport_err)?
        } else {
            let tls = TlsParameters::new(config.host.clone()).map_err(transport_err)?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .tls(Tls::Opportunistic(tls))
        };

        builder = builder.port(config.port).timeout(Some(config.timeout()));

        if let Some(user) = &config.user {
            let password = config.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(user.clone(), password));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(mail: OutgoingMail) -> Result<Message, NotificationError> {
        let parse = |address: &str| {
            address.parse::<Mailbox>().map_err(|e| {
                NotificationError::Compose(format!("invalid address {:?}: {}", address, e))
            })
        };

        Message::builder()
            .from(parse(&mail.from)?)
            .to(parse(&mail.to)?)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)
            .map_err(|e| NotificationError::Compose(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        let message = Self::build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        Ok(())
    }
}
