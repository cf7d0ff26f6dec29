//! Send notification handler

use std::net::SocketAddr;

use axum::extract::{rejection::QueryRejection, ConnectInfo, Query, State};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    domain::notifications::{NotificationService, SendParams},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Body returned once the mail backend accepted the message
pub const SENT: &str = "Mail has been send";

/// Send notification query parameters
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SendQuery {
    /// Hostname or identifier of the reporting system
    #[param(example = "web1")]
    server: Option<String>,

    /// Template id
    #[param(example = "backup_ok")]
    temp: Option<String>,

    /// Recipient address
    #[param(example = "ops@example.com")]
    mail: Option<String>,

    /// Colon-delimited backup descriptors
    #[param(example = "db1.tar.gz:files.tar.gz")]
    list: Option<String>,

    /// `EN` or `UA`, defaults to `UA`
    #[param(example = "EN")]
    lang: Option<String>,

    /// Error text, used by the `error` template
    #[param(example = "disk full")]
    err: Option<String>,

    /// Colon-delimited free-text lines, takes precedence over `err` and `list`
    payload: Option<String>,
}

impl From<SendQuery> for SendParams {
    fn from(query: SendQuery) -> Self {
        Self {
            server: query.server,
            template: query.temp,
            recipient: query.mail,
            backup_list: query.list,
            language: query.lang,
            error_text: query.err,
            payload: query.payload,
        }
    }
}

/// Send a templated notification mail
#[utoipa::path(
    get,
    operation_id = "send",
    tag = "Notifications",
    path = "/api/v1/send",
    params(SendQuery),
    responses(
        (status = StatusCode::OK, description = "Mail sent", body = String, example = json!("Mail has been send")),
        (status = StatusCode::BAD_REQUEST, description = "Missing field, unknown language or invalid template id", body = String, example = json!("Invalid language: DE")),
        (status = StatusCode::FORBIDDEN, description = "Caller is not on the allow-list", body = String, example = json!("203.0.113.7 not allowed to send mail here")),
        (status = StatusCode::NOT_FOUND, description = "Template not found", body = String),
        (status = StatusCode::BAD_GATEWAY, description = "Mail backend error", body = String, example = json!("Mailer Error: SMTP connect() failed")),
    )
)]
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
    ConnectInfo(caller): ConnectInfo<SocketAddr>,
    query: Result<Query<SendQuery>, QueryRejection>,
) -> Result<&'static str, ApiError> {
    let Query(query) = query?;

    state
        .notifications
        .send_notification(query.into(), &caller.ip().to_string())
        .await?;

    Ok(SENT)
}
