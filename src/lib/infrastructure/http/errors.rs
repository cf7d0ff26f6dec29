//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::notifications::SendMailError;

/// An error raised in the API, rendered as plain text
#[derive(Debug)]
pub struct ApiError {
    /// The status code
    pub status: StatusCode,

    /// The error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new forbidden error
    pub fn new_403(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Create a new not found error
    pub fn new_404(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create a new bad gateway error
    pub fn new_502(message: &str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        unknown_error(err)
    }
}

impl From<SendMailError> for ApiError {
    fn from(err: SendMailError) -> Self {
        let message = err.to_string();

        match err {
            SendMailError::MissingField { .. }
            | SendMailError::UnrecognizedLanguage(_)
            | SendMailError::InvalidTemplateId(_) => ApiError::new_400(&message),
            SendMailError::IpNotAllowed(_) => ApiError::new_403(&message),
            SendMailError::TemplateNotFound { .. } => ApiError::new_404(&message),
            SendMailError::DeliveryFailure(_) => ApiError::new_502(&message),
            SendMailError::UnknownError(err) => unknown_error(err),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

fn unknown_error(err: anyhow::Error) -> ApiError {
    error!("unexpected error: {err:#}");

    ApiError::new_500("An unknown error occurred, please try again")
}
