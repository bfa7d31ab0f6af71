// ABOUTME: HTTP middleware configuration for the formulation API
// ABOUTME: Cross-origin policy built from server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer construction
pub mod cors;

pub use cors::setup_cors;
