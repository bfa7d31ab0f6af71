// ABOUTME: Main library entry point for the Kibble formulation server
// ABOUTME: Wires configuration, logging, the SQLite catalog and the HTTP API around the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Kibble Server
//!
//! HTTP front end for the dog-food formulation engine in `kibble-formulation`.
//! A request names the ingredients the owner wants; the server loads them and
//! the fixed base from the catalog in one pass, runs the engine, and returns a
//! dry-matter breakdown with nutrient percentages and any issues found.
//!
//! ## Architecture
//!
//! - **Catalog**: `IngredientCatalog` trait with SQLite and in-memory backends
//! - **Services**: per-request snapshot loading and engine invocation
//! - **Routes**: axum handlers for `/health`, `/ready`, `/ingredients`, `/calculate`
//! - **Config**: environment-driven server and formulation settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kibble_server::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     kibble_server::logging::init_from_env()?;
//!     kibble_server::server::run(config).await
//! }
//! ```

/// Ingredient catalog trait and in-memory implementation
pub mod catalog;

/// Environment-based configuration
pub mod config;

/// Server defaults, environment keys and shared domain constants
pub mod constants;

/// SQLite catalog storage and fixture seeding
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serve loop
pub mod server;

/// Request orchestration between routes and the engine
pub mod services;

pub use kibble_core::errors::{AppError, AppResult, ErrorCode};
pub use kibble_formulation::{FormulationConfig, FormulationReport};
