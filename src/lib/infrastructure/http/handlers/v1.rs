use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    domain::notifications::NotificationService,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod send;
pub mod uptime;

pub fn router<N: NotificationService>() -> Router<AppState<N>> {
    Router::new()
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<N>))
        .route("/send", get(send::handler::<N>))
}
