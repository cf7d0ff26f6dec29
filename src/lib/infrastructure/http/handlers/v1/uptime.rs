//! Uptime handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{domain::notifications::NotificationService, infrastructure::http::state::AppState};

/// How long the relay has been accepting requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UptimeResponse {
    /// Seconds since the relay started
    #[schema(example = 123)]
    pub uptime: i64,

    /// When the relay started
    pub started_at: DateTime<Utc>,
}

/// Get the uptime of the relay
#[utoipa::path(
    get,
    operation_id = "uptime",
    tag = "System",
    path = "/api/v1/uptime",
    responses(
        (status = StatusCode::OK, description = "Uptime response", body = UptimeResponse),
    )
)]
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
) -> Json<UptimeResponse> {
    Json(UptimeResponse {
        uptime: (Utc::now() - state.start_time).num_seconds(),
        started_at: state.start_time,
    })
}
