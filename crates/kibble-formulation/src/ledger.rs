// ABOUTME: Allocation ledger threaded explicitly through every pipeline stage
// ABOUTME: Ordered name-indexed DM entries, partitioned into fixed and mutable subsets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Allocation ledger
//!
//! The ledger is the single source of truth for who is in the mix and with how
//! much DM. Each entry appears once; the name index doubles as the used-names
//! registry. Nutrient totals are never stored, only derived.

use crate::totals::{AggregateTotals, IngredientTotals};
use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup, NutrientProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an entry came to be in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Part of the immutable fixed base
    Fixed,
    /// Named in the request
    Selected,
    /// Added by the engine from the catalog (fallback meat, fiber booster)
    AutoAdded,
}

/// DM assigned to one ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Ingredient name, unique within the ledger
    pub name: String,
    /// Food group, `None` for fixed-base ingredients
    pub group: Option<FoodGroup>,
    /// Assigned dry matter (g)
    pub dm_g: f64,
    /// Whether this entry belongs to the fixed base
    pub fixed: bool,
    /// Nutrient profile per 100 g DM
    pub profile: NutrientProfile,
    /// Provenance
    pub origin: EntryOrigin,
}

impl Allocation {
    /// Absolute nutrient amounts at the current DM
    #[must_use]
    pub fn totals(&self) -> IngredientTotals {
        IngredientTotals::compute(&self.profile, self.dm_g)
    }
}

/// Ordered set of allocations keyed by ingredient name
#[derive(Debug, Clone, Default)]
pub struct AllocationLedger {
    entries: Vec<Allocation>,
    index: HashMap<String, usize>,
}

impl AllocationLedger {
    /// Start a ledger from the fixed base
    ///
    /// A fixed name listed twice keeps its first occurrence.
    #[must_use]
    pub fn seed(fixed: &[FixedIngredient]) -> Self {
        let mut ledger = Self::default();
        for item in fixed {
            ledger.insert(Allocation {
                name: item.name.clone(),
                group: None,
                dm_g: item.dm_g,
                fixed: true,
                profile: item.profile,
                origin: EntryOrigin::Fixed,
            });
        }
        ledger
    }

    fn insert(&mut self, allocation: Allocation) -> bool {
        if self.index.contains_key(&allocation.name) {
            return false;
        }
        self.index.insert(allocation.name.clone(), self.entries.len());
        self.entries.push(allocation);
        true
    }

    /// Whether `name` has already been allocated
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Record `dm_g` for a candidate not yet in the ledger
    ///
    /// Returns `false` and leaves the ledger untouched if the name is already
    /// present.
    pub fn assign(&mut self, candidate: &CandidateIngredient, dm_g: f64, origin: EntryOrigin) -> bool {
        self.insert(Allocation {
            name: candidate.name.clone(),
            group: Some(candidate.group),
            dm_g,
            fixed: false,
            profile: candidate.profile,
            origin,
        })
    }

    /// Look up an entry by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Allocation> {
        self.index.get(name).and_then(|&i| self.entries.get(i))
    }

    /// Entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[Allocation] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grand total DM
    #[must_use]
    pub fn total_dm(&self) -> f64 {
        self.entries.iter().map(|e| e.dm_g).sum()
    }

    /// DM of the fixed base
    #[must_use]
    pub fn fixed_dm(&self) -> f64 {
        self.entries.iter().filter(|e| e.fixed).map(|e| e.dm_g).sum()
    }

    /// DM of every non-fixed entry
    #[must_use]
    pub fn mutable_dm(&self) -> f64 {
        self.entries.iter().filter(|e| !e.fixed).map(|e| e.dm_g).sum()
    }

    /// DM currently assigned to entries in any of `groups`
    #[must_use]
    pub fn dm_in_groups(&self, groups: &[FoodGroup]) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.group.is_some_and(|g| groups.contains(&g)))
            .map(|e| e.dm_g)
            .sum()
    }

    /// Multiply every non-fixed entry's DM by `factor`
    pub fn scale_mutable(&mut self, factor: f64) {
        self.scale_where(|_| true, factor);
    }

    /// Multiply the DM of non-fixed entries matching `predicate` by `factor`
    ///
    /// Returns the number of entries touched. Fixed entries are never passed to
    /// the predicate.
    pub fn scale_where<F>(&mut self, predicate: F, factor: f64) -> usize
    where
        F: Fn(&Allocation) -> bool,
    {
        let mut touched = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.fixed) {
            if predicate(entry) {
                entry.dm_g *= factor;
                touched += 1;
            }
        }
        touched
    }

    /// Aggregate nutrient totals over every entry, recomputed from scratch
    #[must_use]
    pub fn totals(&self) -> AggregateTotals {
        let items: Vec<IngredientTotals> = self.entries.iter().map(Allocation::totals).collect();
        AggregateTotals::sum(&items)
    }

    /// Aggregate nutrient totals over non-fixed entries only
    #[must_use]
    pub fn mutable_totals(&self) -> AggregateTotals {
        let items: Vec<IngredientTotals> = self
            .entries
            .iter()
            .filter(|e| !e.fixed)
            .map(Allocation::totals)
            .collect();
        AggregateTotals::sum(&items)
    }

    /// Names of entries the engine added on its own
    #[must_use]
    pub fn auto_added(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.origin == EntryOrigin::AutoAdded)
            .map(|e| e.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, group: FoodGroup) -> CandidateIngredient {
        CandidateIngredient::new(name, group, NutrientProfile::default())
    }

    fn fixed_base() -> Vec<FixedIngredient> {
        vec![
            FixedIngredient::new("Calcium Carbonate", 10.0, NutrientProfile::default()),
            FixedIngredient::new("Vitamin Premix", 5.0, NutrientProfile::default()),
        ]
    }

    #[test]
    fn test_seed_marks_fixed_entries() {
        let ledger = AllocationLedger::seed(&fixed_base());
        assert_eq!(ledger.len(), 2);
        assert!(ledger.entries().iter().all(|e| e.fixed));
        assert!((ledger.fixed_dm() - 15.0).abs() < f64::EPSILON);
        assert!(ledger.mutable_dm().abs() < f64::EPSILON);
    }

    #[test]
    fn test_assign_rejects_duplicate_names() {
        let mut ledger = AllocationLedger::default();
        let beef = candidate("Beef", FoodGroup::MeatA);
        assert!(ledger.assign(&beef, 100.0, EntryOrigin::Selected));
        assert!(!ledger.assign(&beef, 50.0, EntryOrigin::Selected));
        assert_eq!(ledger.len(), 1);
        assert!((ledger.total_dm() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaling_never_touches_fixed_entries() {
        let mut ledger = AllocationLedger::seed(&fixed_base());
        ledger.assign(&candidate("Carrot", FoodGroup::VegetableA), 40.0, EntryOrigin::Selected);
        ledger.assign(&candidate("Rice", FoodGroup::GrainA), 60.0, EntryOrigin::Selected);

        ledger.scale_mutable(2.0);
        assert!((ledger.fixed_dm() - 15.0).abs() < f64::EPSILON);
        assert!((ledger.mutable_dm() - 200.0).abs() < 1e-9);

        let touched = ledger.scale_where(|e| e.name.contains("Carrot"), 0.5);
        assert_eq!(touched, 1);
        assert!((ledger.get("Carrot").map_or(0.0, |e| e.dm_g) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_dm_in_groups_and_auto_added() {
        let mut ledger = AllocationLedger::seed(&fixed_base());
        ledger.assign(&candidate("Beef", FoodGroup::MeatA), 100.0, EntryOrigin::Selected);
        ledger.assign(&candidate("Duck Fat", FoodGroup::MeatC), 50.0, EntryOrigin::AutoAdded);
        ledger.assign(&candidate("Rice", FoodGroup::GrainA), 60.0, EntryOrigin::Selected);

        assert!((ledger.dm_in_groups(&FoodGroup::MEATS) - 150.0).abs() < 1e-9);
        assert_eq!(ledger.auto_added(), vec!["Duck Fat".to_owned()]);
    }
}
