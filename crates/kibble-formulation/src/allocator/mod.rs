// ABOUTME: Group allocator applying ordered quota rules per food group to the ledger
// ABOUTME: Organ, vegetable, fruit, oil, grain and meat rules built on exact equal splits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Group Allocator
//!
//! Rules run in a fixed order and each one only sees candidates the ledger has
//! not already taken, so no ingredient is counted twice across rules. Missing
//! liver or meat is recorded as an issue and allocation continues.

/// Meat policy decision table
pub mod meat;

pub use meat::{animal_keyword, average_fat, MeatPolicy, MeatPools};

use crate::config::FormulationConfig;
use crate::ledger::{AllocationLedger, EntryOrigin};
use crate::snapshot::CatalogSnapshot;
use kibble_core::constants::{issues, keywords};
use kibble_core::models::{CandidateIngredient, FoodGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// DM assigned by each rule during one allocation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Liver plus other organs (g)
    pub organ_g: f64,
    /// Vegetable tiers A, B and C (g)
    pub vegetables_g: f64,
    /// Fruit (g)
    pub fruit_g: f64,
    /// Oil (g)
    pub oil_g: f64,
    /// Grain tiers including backfill (g)
    pub grains_g: f64,
    /// Meat including fallbacks (g)
    pub meat_g: f64,
    /// Meat decision table row that applied
    pub meat_policy: MeatPolicy,
}

/// Split `target` evenly across the unused candidates of `pool`
///
/// Each share is rounded to 2 decimals and the last candidate absorbs the
/// remainder, so the assigned DM sums to `target` exactly. Returns 0 when the
/// target is not positive or every candidate is already in the ledger.
pub fn distribute_exact<F>(
    ledger: &mut AllocationLedger,
    pool: &[&CandidateIngredient],
    target: f64,
    origin_of: F,
) -> f64
where
    F: Fn(&CandidateIngredient) -> EntryOrigin,
{
    if target <= 0.0 || !target.is_finite() {
        return 0.0;
    }

    let mut seen = HashSet::new();
    let unused: Vec<&CandidateIngredient> = pool
        .iter()
        .copied()
        .filter(|c| !ledger.contains(&c.name) && seen.insert(c.name.as_str()))
        .collect();
    if unused.is_empty() {
        return 0.0;
    }

    let n = unused.len() as f64;
    let mut each = round2(target / n);
    if each * (n - 1.0) > target {
        each = target / n;
    }

    let last = unused.len() - 1;
    let mut assigned = 0.0;
    for (i, candidate) in unused.into_iter().enumerate() {
        let dm = if i < last {
            each
        } else {
            (n - 1.0).mul_add(-each, target)
        };
        ledger.assign(candidate, dm, origin_of(candidate));
        assigned += dm;
    }
    assigned
}

/// Selected when the request named it, auto-added otherwise
pub(crate) fn origin_in(snapshot: &CatalogSnapshot, candidate: &CandidateIngredient) -> EntryOrigin {
    if snapshot.is_selected(&candidate.name) {
        EntryOrigin::Selected
    } else {
        EntryOrigin::AutoAdded
    }
}

/// Round to 2 decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Applies the quota rules against one request's snapshot
pub struct GroupAllocator<'a> {
    snapshot: &'a CatalogSnapshot,
    config: &'a FormulationConfig,
}

impl<'a> GroupAllocator<'a> {
    /// Create an allocator over `snapshot`
    #[must_use]
    pub const fn new(snapshot: &'a CatalogSnapshot, config: &'a FormulationConfig) -> Self {
        Self { snapshot, config }
    }

    /// Run every rule in order, appending missing-data issues to `found`
    pub fn allocate(&self, ledger: &mut AllocationLedger, found: &mut Vec<String>) -> AllocationSummary {
        let organ_g = self.allocate_organs(ledger, found);
        let vegetables_g = self.allocate_vegetables(ledger);
        let fruit_g = self.split(ledger, FoodGroup::Fruit, self.config.fruit_limit_g);
        let oil_g = self.split(ledger, FoodGroup::Oil, self.config.oil_reserved_g);
        let grains_g = self.allocate_grains(ledger);
        let (meat_policy, meat_g) = self.allocate_meat(ledger, found);

        let summary = AllocationSummary {
            organ_g,
            vegetables_g,
            fruit_g,
            oil_g,
            grains_g,
            meat_g,
            meat_policy,
        };
        debug!(?summary, total_dm = ledger.total_dm(), "group allocation complete");
        summary
    }

    fn split(&self, ledger: &mut AllocationLedger, group: FoodGroup, target: f64) -> f64 {
        let pool = self.snapshot.pool(group);
        distribute_exact(ledger, &pool, target, |_| EntryOrigin::Selected)
    }

    /// First liver takes its share; other organs fill the rest of the organ target
    fn allocate_organs(&self, ledger: &mut AllocationLedger, found: &mut Vec<String>) -> f64 {
        let organs = self.snapshot.pool(FoodGroup::Organ);
        let (livers, others): (Vec<_>, Vec<_>) = organs
            .into_iter()
            .partition(|c| c.name.to_lowercase().contains(keywords::LIVER));

        let Some(liver) = livers.first() else {
            warn!("no liver among selected organ ingredients");
            found.push(issues::LIVER_REQUIRED.to_owned());
            return 0.0;
        };

        let organ = &self.config.organ;
        let liver_used = distribute_exact(ledger, &[*liver], organ.liver_dm_g(), |_| EntryOrigin::Selected);
        let other_used = distribute_exact(ledger, &others, organ.target_g - liver_used, |_| {
            EntryOrigin::Selected
        });
        debug!(liver = %liver.name, liver_used, other_used, "organ rule");
        liver_used + other_used
    }

    fn allocate_vegetables(&self, ledger: &mut AllocationLedger) -> f64 {
        let rule = &self.config.vegetables;
        let a = self.split(ledger, FoodGroup::VegetableA, rule.a_min_g);
        let b = self.split(ledger, FoodGroup::VegetableB, rule.b_min_g);
        let c_target = (rule.combined_target_g - a - b).max(0.0);
        let c = self.split(ledger, FoodGroup::VegetableC, c_target);
        a + b + c
    }

    /// Grain-A minimum, grain-B maximum, then backfill from unused grain-A
    fn allocate_grains(&self, ledger: &mut AllocationLedger) -> f64 {
        let rule = &self.config.grains;
        let a = self.split(ledger, FoodGroup::GrainA, rule.a_min_g);
        let b = self.split(ledger, FoodGroup::GrainB, rule.b_max_g);
        let mut total = a + b;
        if total < rule.target_g {
            let backfill = self.split(ledger, FoodGroup::GrainA, rule.target_g - total);
            debug!(backfill, "grain backfill");
            total += backfill;
        }
        total
    }

    fn allocate_meat(&self, ledger: &mut AllocationLedger, found: &mut Vec<String>) -> (MeatPolicy, f64) {
        let a = self.snapshot.pool(FoodGroup::MeatA);
        let b = self.snapshot.pool(FoodGroup::MeatB);
        let c = self.snapshot.pool(FoodGroup::MeatC);
        let pools = MeatPools { a: &a, b: &b, c: &c };

        let policy = MeatPolicy::select(pools, &self.config.meat);
        if policy == MeatPolicy::NoMeat {
            warn!("no meat-group ingredient selected");
            found.push(issues::NO_MEAT_SELECTED.to_owned());
        }
        let used = policy.apply(ledger, pools, self.snapshot, &self.config.meat);
        debug!(?policy, used, "meat rule");
        (policy, used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kibble_core::models::NutrientProfile;

    fn item(name: &str, group: FoodGroup) -> CandidateIngredient {
        CandidateIngredient::new(name, group, NutrientProfile::default())
    }

    fn snapshot_of(selected: Vec<CandidateIngredient>) -> CatalogSnapshot {
        CatalogSnapshot {
            selected,
            ..CatalogSnapshot::default()
        }
    }

    #[test]
    fn test_distribute_exact_sums_to_target() {
        let items: Vec<CandidateIngredient> = ["A", "B", "C"]
            .iter()
            .map(|n| item(n, FoodGroup::GrainA))
            .collect();
        let pool: Vec<&CandidateIngredient> = items.iter().collect();
        let mut ledger = AllocationLedger::default();

        let used = distribute_exact(&mut ledger, &pool, 100.0, |_| EntryOrigin::Selected);

        assert!((used - 100.0).abs() < 1e-9);
        assert!((ledger.total_dm() - 100.0).abs() < 1e-9);
        assert!((ledger.get("A").map_or(0.0, |e| e.dm_g) - 33.33).abs() < 1e-9);
        assert!((ledger.get("C").map_or(0.0, |e| e.dm_g) - 33.34).abs() < 1e-9);
    }

    #[test]
    fn test_distribute_exact_degenerate_inputs() {
        let carrot = item("Carrot", FoodGroup::VegetableA);
        let mut ledger = AllocationLedger::default();

        assert!(distribute_exact(&mut ledger, &[], 80.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
        assert!(distribute_exact(&mut ledger, &[&carrot], 0.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
        assert!(distribute_exact(&mut ledger, &[&carrot], -5.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
        assert!(ledger.is_empty());

        distribute_exact(&mut ledger, &[&carrot], 40.0, |_| EntryOrigin::Selected);
        assert!(distribute_exact(&mut ledger, &[&carrot], 40.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_distribute_exact_tiny_target_never_overshoots() {
        let items: Vec<CandidateIngredient> = (0..7).map(|i| item(&format!("G{i}"), FoodGroup::GrainA)).collect();
        let pool: Vec<&CandidateIngredient> = items.iter().collect();
        let mut ledger = AllocationLedger::default();

        let used = distribute_exact(&mut ledger, &pool, 0.03, |_| EntryOrigin::Selected);

        assert!((used - 0.03).abs() < 1e-12);
        assert!(ledger.entries().iter().all(|e| e.dm_g >= 0.0));
    }

    #[test]
    fn test_organ_rule_liver_and_heart() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![
            item("Chicken Liver", FoodGroup::Organ),
            item("Chicken Heart", FoodGroup::Organ),
        ]);
        let mut ledger = AllocationLedger::default();
        let mut found = Vec::new();

        let summary = GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut found);

        assert!((ledger.get("Chicken Liver").map_or(0.0, |e| e.dm_g) - 100.0).abs() < 1e-9);
        assert!((ledger.get("Chicken Heart").map_or(0.0, |e| e.dm_g) - 50.0).abs() < 1e-9);
        assert!((summary.organ_g - 150.0).abs() < 1e-9);
        assert!(!found.contains(&issues::LIVER_REQUIRED.to_owned()));
    }

    #[test]
    fn test_organ_rule_without_liver_records_issue() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![item("Beef Kidney", FoodGroup::Organ)]);
        let mut ledger = AllocationLedger::default();
        let mut found = Vec::new();

        GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut found);

        assert!(!ledger.contains("Beef Kidney"));
        assert!(found.contains(&issues::LIVER_REQUIRED.to_owned()));
    }

    #[test]
    fn test_only_first_liver_is_used() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![
            item("Beef Liver", FoodGroup::Organ),
            item("Chicken Liver", FoodGroup::Organ),
            item("Beef Heart", FoodGroup::Organ),
        ]);
        let mut ledger = AllocationLedger::default();

        GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut Vec::new());

        assert!(ledger.contains("Beef Liver"));
        assert!(!ledger.contains("Chicken Liver"));
        assert!((ledger.get("Beef Heart").map_or(0.0, |e| e.dm_g) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_vegetable_tiers() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![
            item("Carrot", FoodGroup::VegetableA),
            item("Pumpkin", FoodGroup::VegetableA),
            item("Spinach", FoodGroup::VegetableB),
            item("Kale", FoodGroup::VegetableC),
        ]);
        let mut ledger = AllocationLedger::default();

        let summary = GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut Vec::new());

        assert!((ledger.get("Carrot").map_or(0.0, |e| e.dm_g) - 40.0).abs() < 1e-9);
        assert!((ledger.get("Pumpkin").map_or(0.0, |e| e.dm_g) - 40.0).abs() < 1e-9);
        assert!((ledger.get("Spinach").map_or(0.0, |e| e.dm_g) - 50.0).abs() < 1e-9);
        assert!((ledger.get("Kale").map_or(0.0, |e| e.dm_g) - 20.0).abs() < 1e-9);
        assert!((summary.vegetables_g - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_grain_rule_without_backfill_candidates() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![
            item("Brown Rice", FoodGroup::GrainA),
            item("Oats", FoodGroup::GrainB),
        ]);
        let mut ledger = AllocationLedger::default();

        let summary = GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut Vec::new());

        assert!((ledger.get("Brown Rice").map_or(0.0, |e| e.dm_g) - 150.0).abs() < 1e-9);
        assert!((ledger.get("Oats").map_or(0.0, |e| e.dm_g) - 200.0).abs() < 1e-9);
        assert!((summary.grains_g - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_grain_shortfall_stays_when_pool_exhausted() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![item("Brown Rice", FoodGroup::GrainA)]);
        let mut ledger = AllocationLedger::default();

        let summary = GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut Vec::new());

        assert!((summary.grains_g - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_meat_records_issue() {
        let config = FormulationConfig::default();
        let snapshot = snapshot_of(vec![item("Carrot", FoodGroup::VegetableA)]);
        let mut ledger = AllocationLedger::default();
        let mut found = Vec::new();

        let summary = GroupAllocator::new(&snapshot, &config).allocate(&mut ledger, &mut found);

        assert_eq!(summary.meat_policy, MeatPolicy::NoMeat);
        assert!(summary.meat_g.abs() < f64::EPSILON);
        assert!(found.contains(&issues::NO_MEAT_SELECTED.to_owned()));
    }

    #[test]
    fn test_round2() {
        assert!((round2(33.333_333) - 33.33).abs() < 1e-12);
        assert!((round2(2.675_1) - 2.68).abs() < 1e-12);
    }
}
