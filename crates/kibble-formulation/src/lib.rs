// ABOUTME: Dog-food formulation engine computing DM per ingredient for a fixed-total mix
// ABOUTME: Group quota allocation, total-DM normalization, and protein/fiber feedback passes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Kibble Formulation
//!
//! Pure, synchronous engine. Given a [`CatalogSnapshot`] (fixed base plus the
//! resolved request pool and the catalog subsets used for fallbacks) and a
//! [`FormulationConfig`], [`formulate`] returns the final allocation ledger and
//! issues, from which a [`FormulationReport`] is built.
//!
//! Stages, in order:
//! 1. seed the ledger with the fixed base
//! 2. group allocator (organ, vegetables, fruit, oil, grains, meat policy table)
//! 3. total-DM normalizer
//! 4. nutrient feedback adjuster (protein, then fiber)
//! 5. totals aggregator and report

/// Group quota rules
pub mod allocator;
/// Thresholds and quotas
pub mod config;
/// Configuration validation errors
pub mod error;
/// Protein and fiber feedback passes
pub mod feedback;
/// Allocation ledger
pub mod ledger;
/// Total-DM normalizer
pub mod normalizer;
/// Pipeline entry point
pub mod pipeline;
/// Presentation report
pub mod report;
/// Per-request catalog snapshot
pub mod snapshot;
/// Nutrient totals
pub mod totals;

pub use allocator::{distribute_exact, AllocationSummary, GroupAllocator, MeatPolicy};
pub use config::FormulationConfig;
pub use error::ConfigError;
pub use feedback::{FiberAdjustment, ProteinAdjustment};
pub use ledger::{Allocation, AllocationLedger, EntryOrigin};
pub use normalizer::NormalizationOutcome;
pub use pipeline::{formulate, Formulation};
pub use report::FormulationReport;
pub use snapshot::{dedupe_names, CatalogSnapshot};
pub use totals::{AggregateTotals, IngredientTotals};
