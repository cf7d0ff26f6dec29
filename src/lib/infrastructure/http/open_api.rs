//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::handlers::v1::*;

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "localmail"),
    paths(send::handler, uptime::handler),
    components(schemas(uptime::UptimeResponse))
)]
pub struct ApiDocs;
