//! Email message

/// Email message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The recipient of the email, as received
    pub to: String,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,
}
