// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Allows the configured browser origins to call the formulation API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::{environment::parse_origins, ServerConfig};
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS for the formulation API
///
/// Origins come from `CORS_ALLOWED_ORIGINS`. An empty value or `*` allows any
/// origin; otherwise the comma-separated list is used verbatim. Entries that are
/// not valid header values are skipped, and if none survive any origin is
/// allowed.
///
/// ```bash
/// # Local frontend dev servers (default)
/// export CORS_ALLOWED_ORIGINS="http://localhost:3000,http://localhost:3001"
/// ```
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allowed = config.cors.allowed_origins.trim();
    let allow_origin = if allowed.is_empty() || allowed == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = parse_origins(allowed)
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("access-control-request-method"),
            HeaderName::from_static("access-control-request-headers"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
