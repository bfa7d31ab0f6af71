// ABOUTME: Core types and constants for the Kibble recipe formulation platform
// ABOUTME: Foundation crate with error handling, nutrition models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Kibble Core
//!
//! Foundation crate providing shared types and constants for the Kibble dog-food
//! formulation platform. This crate is designed to change infrequently, so the
//! engine and the server can depend on it without rebuilding each other.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Ingredient, food-group and nutrient-profile definitions
//! - **constants**: Issue messages and keyword vocabularies shared across crates

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (ingredients, food groups, nutrient profiles)
pub mod models;
