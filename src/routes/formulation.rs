// ABOUTME: Formulation route handlers for catalog listing and recipe calculation
// ABOUTME: GET /ingredients and POST /calculate over the formulation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use kibble_core::errors::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /calculate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Requested ingredient names, in priority order
    pub ingredients: Vec<String>,
}

/// Formulation routes
pub struct FormulationRoutes;

impl FormulationRoutes {
    /// Create the formulation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ingredients", get(Self::handle_list_ingredients))
            .route("/calculate", post(Self::handle_calculate))
            .with_state(resources)
    }

    /// Handle catalog listing
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let listing = resources.formulation.list_ingredients().await?;
        Ok((StatusCode::OK, Json(listing)).into_response())
    }

    /// Handle recipe calculation
    async fn handle_calculate(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CalculateRequest>,
    ) -> Result<Response, AppError> {
        let report = resources.formulation.calculate(&request.ingredients).await?;
        Ok((StatusCode::OK, Json(report)).into_response())
    }
}
