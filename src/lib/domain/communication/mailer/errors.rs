//! Mailer errors

use thiserror::Error;

/// Mailer errors
///
/// The `Display` output is the detail string surfaced to callers after
/// `Mailer Error: `.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The recipient could not be parsed as a mailbox
    #[error("Invalid address: (to): {0}")]
    InvalidAddress(String),

    /// The message could not be built or the transport rejected it
    #[error("{0}")]
    SendError(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
