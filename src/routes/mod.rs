// ABOUTME: HTTP route definitions and the shared resources handed to handlers
// ABOUTME: Health checks plus the ingredient listing and formulation endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each route group is a unit struct with a `routes()` constructor; the server
//! merges them and adds the tower-http layers.

use crate::catalog::IngredientCatalog;
use crate::config::ServerConfig;
use crate::services::FormulationService;
use std::sync::Arc;

/// Formulation endpoints
pub mod formulation;
/// Health and readiness checks
pub mod health;

pub use formulation::{CalculateRequest, FormulationRoutes};
pub use health::HealthRoutes;

/// Shared state for all handlers
pub struct ServerResources {
    /// Formulation service over the configured catalog
    pub formulation: FormulationService,
    /// Server configuration the process started with
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Build resources over a catalog implementation
    #[must_use]
    pub fn new(catalog: Arc<dyn IngredientCatalog>, config: Arc<ServerConfig>) -> Self {
        let formulation = FormulationService::new(catalog, config.formulation.clone());
        Self {
            formulation,
            config,
        }
    }
}
