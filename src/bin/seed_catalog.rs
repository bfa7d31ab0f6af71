// ABOUTME: Catalog seeding utility for the Kibble formulation server
// ABOUTME: Loads a JSON fixture of ingredients and the fixed base into the SQLite catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Catalog seeder.
//!
//! Usage:
//! ```bash
//! # Seed the bundled demo catalog (uses DATABASE_URL from environment)
//! cargo run --bin kibble-seed
//!
//! # Custom fixture and database
//! cargo run --bin kibble-seed -- --fixture my_catalog.json --database-url sqlite:./data/test.db
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use kibble_server::{
    config::DatabaseUrl,
    constants::{defaults, env_keys},
    database::{CatalogDatabase, CatalogFixture},
};
use std::env;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "kibble-seed",
    about = "Kibble catalog seeder",
    long_about = "Load ingredient and fixed-base fixtures into the Kibble SQLite catalog"
)]
struct SeedArgs {
    /// Fixture file to load
    #[arg(long, default_value = "data/demo_catalog.json")]
    fixture: PathBuf,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = args
        .database_url
        .or_else(|| env::var(env_keys::DATABASE_URL).ok())
        .unwrap_or_else(|| defaults::DATABASE_URL.to_owned());
    let url = DatabaseUrl::parse_url(&database_url);

    info!("Connecting to database: {url}");
    let database = CatalogDatabase::connect(&url)
        .await
        .context("Failed to connect to catalog database")?;
    database.migrate().await.context("Failed to migrate catalog")?;

    let fixture = CatalogFixture::load(&args.fixture)
        .await
        .with_context(|| format!("Failed to load fixture {}", args.fixture.display()))?;
    let summary = fixture.seed(&database).await.context("Failed to seed catalog")?;

    info!(
        "Seeded {} ingredients and {} fixed ingredients",
        summary.ingredients, summary.fixed
    );
    Ok(())
}
