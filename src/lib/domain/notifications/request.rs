//! Send requests: raw parameters and their validated form

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use super::{AllowList, SendMailError};

lazy_static! {
    static ref TEMPLATE_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Raw, untrusted send parameters exactly as received
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendParams {
    /// Hostname or identifier of the reporting system
    pub server: Option<String>,

    /// Template id
    pub template: Option<String>,

    /// Recipient address
    pub recipient: Option<String>,

    /// Colon-delimited backup descriptors
    pub backup_list: Option<String>,

    /// `EN` or `UA`
    pub language: Option<String>,

    /// Error text for the `error` template
    pub error_text: Option<String>,

    /// Colon-delimited free-text lines
    pub payload: Option<String>,
}

/// Language of a notification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    /// English
    En,

    /// Ukrainian
    #[default]
    Ua,
}

impl Language {
    /// The code used in template file names
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Ua => "UA",
        }
    }

    /// Heading shown above the backup list
    pub fn backup_list_heading(&self) -> &'static str {
        match self {
            Self::En => "List of your current local backup:",
            Self::Ua => "Список локальних бекапів:",
        }
    }
}

impl FromStr for Language {
    type Err = SendMailError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "EN" => Ok(Self::En),
            "UA" => Ok(Self::Ua),
            _ => Err(SendMailError::UnrecognizedLanguage(raw.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A template id that is safe to use as part of a file name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateId(String);

impl TemplateId {
    /// Id of the template that carries the caller's error text
    pub const ERROR: &'static str = "error";

    /// Create a new template id
    pub fn new(raw: &str) -> Result<Self, SendMailError> {
        if !TEMPLATE_ID_REGEX.is_match(raw) {
            return Err(SendMailError::InvalidTemplateId(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    /// Whether this is the error template
    pub fn is_error(&self) -> bool {
        self.0 == Self::ERROR
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A send request that passed validation
///
/// Only [`SendRequest::validate`] produces values of this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendRequest {
    server: String,
    template: TemplateId,
    recipient: String,
    language: Language,
    backup_list: String,
    error_text: String,
    payload: String,
    caller_ip: String,
}

impl SendRequest {
    /// Validates raw parameters and checks the caller against the allow-list.
    ///
    /// Checks run in order: required fields, language, caller address,
    /// template id. The first failing check is returned.
    pub async fn validate<A: AllowList>(
        params: SendParams,
        caller_ip: &str,
        allow_list: &A,
    ) -> Result<Self, SendMailError> {
        let server = params.server.unwrap_or_default();
        let template = params.template.unwrap_or_default();
        let recipient = params.recipient.unwrap_or_default();

        if server.is_empty() || template.is_empty() || recipient.is_empty() {
            return Err(SendMailError::MissingField {
                server,
                template,
                recipient,
            });
        }

        let language = match params.language.as_deref() {
            None | Some("") => Language::default(),
            Some(raw) => raw.parse()?,
        };

        if !allow_list.contains(caller_ip).await {
            return Err(SendMailError::IpNotAllowed(caller_ip.to_string()));
        }

        Ok(Self {
            template: TemplateId::new(&template)?,
            server,
            recipient,
            language,
            backup_list: params.backup_list.unwrap_or_default(),
            error_text: params.error_text.unwrap_or_default(),
            payload: params.payload.unwrap_or_default(),
            caller_ip: caller_ip.to_string(),
        })
    }

    /// Hostname or identifier of the reporting system
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Selected template
    pub fn template(&self) -> &TemplateId {
        &self.template
    }

    /// Recipient address
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Notification language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Colon-delimited backup descriptors, possibly empty
    pub fn backup_list(&self) -> &str {
        &self.backup_list
    }

    /// Error text, possibly empty
    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// Colon-delimited payload lines, possibly empty
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Address the request came from
    pub fn caller_ip(&self) -> &str {
        &self.caller_ip
    }
}
