// ABOUTME: Configuration module for the formulation server
// ABOUTME: Environment-driven server settings wrapping the engine's formulation thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable parsing
pub mod environment;

pub use environment::{CorsConfig, DatabaseConfig, DatabaseUrl, Environment, ServerConfig};
