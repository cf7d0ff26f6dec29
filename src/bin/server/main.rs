#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! HTTP front end for the notification mail relay

use std::{net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use localmail::{
    domain::notifications::NotificationServiceImpl,
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        files::{FileActivityLog, FileAllowList, FileTemplateStore, FilesConfig},
        http::{
            servers::{http::HttpServer, https::HttpsServer},
            state::AppState,
            HttpServerConfig, Server,
        },
    },
};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Allow-list, template and log locations
    #[clap(flatten)]
    pub files: FilesConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = dotenv {
        warn!("no .env file loaded: {e}");
    }

    let args = Args::parse();

    let notifications = NotificationServiceImpl::new(
        Arc::new(SMTPMailer::new(args.smtp)?),
        Arc::new(FileActivityLog::new(&args.files.log_file)),
        Arc::new(FileAllowList::new(&args.files.allow_list_file)),
        Arc::new(FileTemplateStore::new(&args.files.template_dir)),
    );

    let state = AppState::new(notifications);

    let mut servers = JoinSet::new();

    servers.spawn(
        HttpServer::new(
            SocketAddr::new(args.server.host, args.server.http_port),
            state.clone(),
        )?
        .run(),
    );

    if let Some((cert_path, key_path)) = args.server.tls() {
        rustls::crypto::ring::default_provider()
            .install_default()
            .map_err(|_| anyhow!("failed to install the rustls crypto provider"))?;

        servers.spawn(
            HttpsServer::new(
                SocketAddr::new(args.server.host, args.server.https_port),
                cert_path,
                key_path,
                state,
            )
            .await?
            .run(),
        );
    }

    info!(
        templates = %args.files.template_dir.display(),
        allow_list = %args.files.allow_list_file.display(),
        "relay ready"
    );

    while let Some(result) = servers.join_next().await {
        result??;
    }

    Ok(())
}
