//! HTTP Server

use std::{net::IpAddr, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use axum::{extract::Request, routing::get, Router};
use axum_server::Handle;
use clap::Parser;
use handlers::{panic_handler, v1};
use state::AppState;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info_span};

use crate::domain::notifications::NotificationService;

pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod servers;
pub mod state;

/// Configuration for the HTTP servers.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The address to listen on
    #[arg(long, env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// The plain HTTP port to listen on
    #[arg(long, env = "HTTP_PORT", default_value = "3000")]
    pub http_port: u16,

    /// The HTTPS port to listen on
    #[arg(long, env = "HTTPS_PORT", default_value = "3443")]
    pub https_port: u16,

    /// PEM certificate; HTTPS is served only when this and `key_path` are set
    #[arg(long, env = "TLS_CERT_PATH")]
    pub cert_path: Option<String>,

    /// PEM private key
    #[arg(long, env = "TLS_KEY_PATH")]
    pub key_path: Option<String>,
}

impl HttpServerConfig {
    /// The certificate and key paths, if HTTPS is configured
    pub fn tls(&self) -> Option<(&str, &str)> {
        self.cert_path.as_deref().zip(self.key_path.as_deref())
    }
}

/// A runnable server
#[async_trait]
pub trait Server: Sized + Send {
    /// Serves requests until a shutdown signal arrives.
    async fn run(self) -> Result<()>;
}

/// Create the application's router
pub fn router<N: NotificationService>(state: AppState<N>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .nest("/api/v1", v1::router())
        .route("/send.php", get(v1::send::handler::<N>))
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
pub(crate) async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}
