// ABOUTME: HTTP server assembly: router, tower-http layers and the listener loop
// ABOUTME: Connects the catalog, applies migrations and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! [`build_router`] is separate from [`run`] so tests can drive the full layer
//! stack with `tower::ServiceExt::oneshot` without binding a socket.

use crate::catalog::IngredientCatalog;
use crate::config::ServerConfig;
use crate::constants::defaults::REQUEST_ID_HEADER;
use crate::database::CatalogDatabase;
use crate::middleware::setup_cors;
use crate::routes::{FormulationRoutes, HealthRoutes, ServerResources};
use anyhow::{Context, Result};
use axum::Router;
use http::HeaderName;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router with all layers applied
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(FormulationRoutes::routes(Arc::clone(resources)))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(setup_cors(&resources.config)),
        )
}

/// Open the configured catalog database, migrating it when enabled
///
/// # Errors
///
/// Returns an error if the connection or migration fails
pub async fn open_catalog(config: &ServerConfig) -> Result<CatalogDatabase> {
    let database = CatalogDatabase::connect(&config.database.url)
        .await
        .context("Failed to open catalog database")?;
    if config.database.auto_migrate {
        database
            .migrate()
            .await
            .context("Failed to migrate catalog database")?;
    }
    Ok(database)
}

/// Run the HTTP server until the process receives Ctrl-C
///
/// # Errors
///
/// Returns an error if the catalog cannot be opened or the port cannot be bound
pub async fn run(config: ServerConfig) -> Result<()> {
    let catalog: Arc<dyn IngredientCatalog> = Arc::new(open_catalog(&config).await?);
    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(catalog, Arc::new(config)));
    let app = build_router(&resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;

    info!(%addr, "Formulation API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
    }
    info!("Shutdown signal received");
}
