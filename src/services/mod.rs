// ABOUTME: Service layer between the HTTP routes and the formulation engine
// ABOUTME: Owns catalog access and request-scoped snapshot construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Formulation request orchestration
pub mod formulation;

pub use formulation::FormulationService;
