// ABOUTME: Per-request catalog snapshot: the single bulk load every rule reads from
// ABOUTME: Selected pool, fixed base, meat catalog for fallbacks, and fiber boosters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything the engine needs from the catalog for one request
///
/// Built once up front so the allocator and feedback passes run without I/O.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Fixed base in catalog order
    pub fixed: Vec<FixedIngredient>,
    /// Requested ingredients that resolved, in first-seen request order
    pub selected: Vec<CandidateIngredient>,
    /// Requested names the catalog does not know
    pub unresolved: Vec<String>,
    /// Every catalog ingredient in meat groups A, B and C
    pub meat_catalog: Vec<CandidateIngredient>,
    /// Catalog fiber boosters in configured priority order
    pub fiber_boosters: Vec<CandidateIngredient>,
}

impl CatalogSnapshot {
    /// Selected candidates in `group`, request order
    #[must_use]
    pub fn pool(&self, group: FoodGroup) -> Vec<&CandidateIngredient> {
        self.selected.iter().filter(|c| c.group == group).collect()
    }

    /// Catalog meat in `group`, catalog order
    #[must_use]
    pub fn catalog_meat(&self, group: FoodGroup) -> Vec<&CandidateIngredient> {
        self.meat_catalog.iter().filter(|c| c.group == group).collect()
    }

    /// Whether `name` was named in the request
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|c| c.name == name)
    }
}

/// Collapse duplicate names, keeping the first occurrence of each
///
/// Names are compared exactly, whitespace included; empty entries are dropped.
#[must_use]
pub fn dedupe_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert((*n).to_owned()))
        .map(str::to_owned)
        .collect()
}
