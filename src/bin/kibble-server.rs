// ABOUTME: HTTP server binary for the Kibble formulation API
// ABOUTME: Loads environment configuration, applies CLI overrides and serves until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Kibble Server Binary
//!
//! ```bash
//! kibble-server --http-port 8081 --database-url sqlite:./data/kibble.db
//! ```

use anyhow::Result;
use clap::Parser;
use kibble_server::{
    config::{DatabaseUrl, ServerConfig},
    logging, server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "kibble-server")]
#[command(about = "Kibble - dog-food recipe formulation API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override catalog database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;
    info!("Starting Kibble formulation API");

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url);
    }
    config.validate()?;
    info!("{}", config.summary());

    if let Err(e) = server::run(config).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
