// ABOUTME: Server binary for the NutriPlan API
// ABOUTME: Loads configuration, opens the database and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `NutriPlan` Server Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nutriplan_server::{
    config::ServerConfig, database::Database, logging, resources::ServerResources,
    routes::build_router,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "nutriplan-server")]
#[command(about = "NutriPlan Pro API - AI-assisted nutrition plans for dietitians")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let database = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;

    let provider = config.ai.build_provider();
    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(config.clone(), database, provider));
    let app = build_router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(port = config.http_port, environment = %config.environment, "NutriPlan server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("NutriPlan server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
