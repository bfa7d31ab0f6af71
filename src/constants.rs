// ABOUTME: System-wide constants for the formulation server
// ABOUTME: Environment variable names, deployment defaults, and re-exported domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Server defaults plus the issue texts and keyword vocabularies shared with
//! the engine.

pub use kibble_core::constants::{issues, keywords, service};

/// Default values used when an environment variable is unset
pub mod defaults {
    /// HTTP API port
    pub const HTTP_PORT: u16 = 8081;

    /// Catalog database location
    pub const DATABASE_URL: &str = "sqlite:./data/kibble.db";

    /// Local web front-end dev servers
    pub const CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

    /// Header carrying the per-request correlation id
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
}

/// Environment variable names
pub mod env_keys {
    /// HTTP API port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Catalog database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Create catalog tables on startup
    pub const AUTO_MIGRATE: &str = "AUTO_MIGRATE";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Total DM override (g)
    pub const TOTAL_DM_G: &str = "KIBBLE_TOTAL_DM_G";
    /// Protein minimum override (%)
    pub const PROTEIN_MIN_PERCENT: &str = "KIBBLE_PROTEIN_MIN_PERCENT";
    /// Protein maximum override (%)
    pub const PROTEIN_MAX_PERCENT: &str = "KIBBLE_PROTEIN_MAX_PERCENT";
    /// Fiber minimum override (%)
    pub const FIBER_MIN_PERCENT: &str = "KIBBLE_FIBER_MIN_PERCENT";
    /// Fiber maximum override (%)
    pub const FIBER_MAX_PERCENT: &str = "KIBBLE_FIBER_MAX_PERCENT";
    /// Fiber level (%) above which the reduction pass runs
    pub const FIBER_REDUCTION_TRIGGER_PERCENT: &str = "KIBBLE_FIBER_REDUCTION_TRIGGER_PERCENT";
}
