// ABOUTME: Server binary for the Cooks Corner recipe-sharing API
// ABOUTME: Loads configuration, prepares the database, and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cooks Corner Server Binary
//!
//! Starts the HTTP API with JWT authentication and `SQLite` storage.

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cooks_corner::{
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources,
    routes,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cooks-corner-server")]
#[command(about = "Cooks Corner - social recipe sharing API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (`sqlite:<path>` or `sqlite::memory:`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&url);
    }

    info!("Starting Cooks Corner server");
    info!("{}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database_url {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }
    }

    let database = Database::new(&config.database_url).await?;
    match database.purge_expired_revocations(Utc::now()).await {
        Ok(purged) => info!(purged, "Expired token revocations purged"),
        Err(e) => warn!("Failed to purge expired token revocations: {e}"),
    }

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, config));
    let app = routes::build_router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
