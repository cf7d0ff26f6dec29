//! Errors raised while handling a send request

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// Errors that can occur while validating, composing or relaying a notification
///
/// `Display` renders the plain-text message returned to the caller, while
/// [`SendMailError::log_message`] renders the line written to the activity log.
#[derive(Debug, Error)]
pub enum SendMailError {
    /// One of `server`, `temp` or `mail` was empty or absent
    #[error("Some var were empty")]
    MissingField {
        /// The `server` parameter as received
        server: String,
        /// The `temp` parameter as received
        template: String,
        /// The `mail` parameter as received
        recipient: String,
    },

    /// The language is neither `EN` nor `UA`
    #[error("Invalid language: {0}")]
    UnrecognizedLanguage(String),

    /// The template id contains characters that cannot name a template file
    #[error("Invalid template id: {0}")]
    InvalidTemplateId(String),

    /// The caller's address is not on the allow-list
    #[error("{0} not allowed to send mail here")]
    IpNotAllowed(String),

    /// The body or subject template file is missing
    #[error("Template file or subject file doesn't exist: {body} {subject}")]
    TemplateNotFound {
        /// Location of the body template
        body: String,
        /// Location of the subject template
        subject: String,
    },

    /// The mail backend refused or failed to deliver the message
    #[error("Mailer Error: {0}")]
    DeliveryFailure(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl SendMailError {
    /// The line recorded in the activity log for this failure
    pub fn log_message(&self) -> String {
        match self {
            Self::MissingField {
                server,
                template,
                recipient,
            } => format!("Some var were empty: S: {server} T: {template} M: {recipient}"),
            Self::UnrecognizedLanguage(lang) => format!("Invalid language specified: {lang}"),
            Self::IpNotAllowed(ip) => format!("IP {ip} is not whitelisted."),
            Self::DeliveryFailure(detail) => {
                format!("Message could not be sent. Mailer Error: {detail}")
            }
            Self::UnknownError(err) => format!("Unexpected error: {err:#}"),
            Self::InvalidTemplateId(_) | Self::TemplateNotFound { .. } => self.to_string(),
        }
    }
}

impl From<MailerError> for SendMailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> SendMailError");

        SendMailError::DeliveryFailure(err.to_string())
    }
}

impl From<askama::Error> for SendMailError {
    fn from(err: askama::Error) -> Self {
        debug!("askama::Error -> SendMailError");

        SendMailError::UnknownError(err.into())
    }
}
