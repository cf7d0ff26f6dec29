//! SMTP email service implementation

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message as MimeMessage, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::mailer::{Mailer, MailerError, Message};

/// Transport security towards the SMTP server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SmtpSecurity {
    /// Implicit TLS, usually port 465
    #[default]
    Ssl,

    /// STARTTLS upgrade, usually port 587
    Tls,

    /// No encryption
    None,
}

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "465")]
    pub port: u16,

    /// The SMTP username, also used as the sender address
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Transport security
    #[clap(long = "smtp-secure", env = "SMTP_SECURE", value_enum, default_value = "ssl")]
    pub security: SmtpSecurity,

    /// Display name of the sender
    #[clap(long = "smtp-from-name", env = "SMTP_FROM_NAME")]
    pub from_name: Option<String>,

    /// Reply-To address
    #[clap(long = "smtp-reply-to", env = "SMTP_REPLY_TO")]
    pub reply_to: Option<String>,

    /// Display name of the Reply-To address
    #[clap(long = "smtp-reply-to-name", env = "SMTP_REPLY_TO_NAME")]
    pub reply_to_name: Option<String>,

    /// Connection timeout in seconds
    #[clap(long = "smtp-timeout", env = "SMTP_TIMEOUT", default_value = "10")]
    pub timeout: u64,
}

/// SMTP mailer
#[derive(Clone)]
pub struct SMTPMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    reply_to: Option<Mailbox>,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    ///
    /// Must be called from within a tokio runtime: building the async
    /// transport spawns its connection pool task.
    pub fn new(config: SMTPConfig) -> Result<Self> {
        let sender = Mailbox::new(
            config.from_name.clone(),
            config
                .username
                .parse::<Address>()
                .with_context(|| format!("invalid sender address {}", config.username))?,
        );

        let reply_to = config
            .reply_to
            .as_deref()
            .map(|address| {
                address
                    .parse::<Address>()
                    .map(|address| Mailbox::new(config.reply_to_name.clone(), address))
                    .with_context(|| format!("invalid reply-to address {address}"))
            })
            .transpose()?;

        Ok(Self {
            transport: Self::transport(&config)?,
            sender,
            reply_to,
        })
    }

    fn transport(config: &SMTPConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let builder = match config.security {
            SmtpSecurity::Ssl => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpSecurity::Tls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        Ok(builder
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout)))
            .build())
    }

    fn build(&self, message: &Message) -> Result<MimeMessage, MailerError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| MailerError::InvalidAddress(message.to.clone()))?;

        let mut builder = MimeMessage::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML);

        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.clone());
        }

        builder
            .body(message.html_body.clone())
            .map_err(|err| MailerError::SendError(err.to_string()))
    }
}

impl fmt::Debug for SMTPMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPMailer")
            .field("sender", &self.sender)
            .field("reply_to", &self.reply_to)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    #[mutants::skip]
    async fn send_email(&self, message: &Message) -> Result<(), MailerError> {
        let email = self.build(message)?;

        debug!(to = %message.to, "submitting message to SMTP relay");

        match self.transport.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(MailerError::SendError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config() -> SMTPConfig {
        SMTPConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: "notify@example.com".to_string(),
            password: "secret".to_string(),
            security: SmtpSecurity::None,
            from_name: Some("Backup robot".to_string()),
            reply_to: Some("support@example.com".to_string()),
            reply_to_name: Some("Support".to_string()),
            timeout: 1,
        }
    }

    fn message(to: &str) -> Message {
        Message {
            to: to.to_string(),
            subject: "Backup completed".to_string(),
            html_body: "<p>ok</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sender_must_be_an_address() {
        let result = SMTPMailer::new(SMTPConfig {
            username: "notify".to_string(),
            ..config()
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_reply_to_must_be_an_address() {
        let result = SMTPMailer::new(SMTPConfig {
            reply_to: Some("support".to_string()),
            ..config()
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected_before_delivery() -> TestResult {
        let mailer = SMTPMailer::new(config())?;

        let result = mailer.send_email(&message("not-an-address")).await;

        assert!(matches!(
            result,
            Err(MailerError::InvalidAddress(address)) if address == "not-an-address"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_built_message_is_html_with_headers() -> TestResult {
        let mailer = SMTPMailer::new(config())?;

        let raw = String::from_utf8(mailer.build(&message("ops@example.com"))?.formatted())?;

        assert!(raw.contains("<notify@example.com>"));
        assert!(raw.contains("<support@example.com>"));
        assert!(raw.contains("To: ops@example.com"));
        assert!(raw.contains("Subject: Backup completed"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(raw.contains("<p>ok</p>"));

        Ok(())
    }
}
