// ABOUTME: Configuration error types for formulation settings validation
// ABOUTME: Defines error variants for invalid ranges, thresholds, and attempt caps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for formulation validation.

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Value is negative, zero where it must be positive, or not finite
    #[error("Value out of range: {field} = {value}")]
    ValueOutOfRange {
        /// Dotted path of the offending field
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A lower bound exceeds its upper bound
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// A loop cap that must allow at least one iteration is zero
    #[error("Invalid attempt cap: {0}")]
    InvalidAttemptCap(&'static str),
}
