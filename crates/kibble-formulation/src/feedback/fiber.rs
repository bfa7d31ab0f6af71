// ABOUTME: Fiber pass: raise low fiber via vegetables then boosters, lower high fiber stepwise
// ABOUTME: Reduction is hard-capped by attempts and aborts early on a plateau
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{balanced, settle, DmBudget};
use crate::allocator::origin_in;
use crate::config::{FiberTargetConfig, FormulationConfig};
use crate::ledger::{Allocation, AllocationLedger};
use crate::snapshot::CatalogSnapshot;
use kibble_core::constants::issues;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What the fiber pass did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FiberAdjustment {
    /// Fiber was within band, or between the maximum and the reduction trigger
    /// (the latter is reported as an issue)
    Unchanged,
    /// Fiber was low: vegetables were increased and boosters possibly added
    Increased {
        /// Boosters added, in order
        boosters: Vec<String>,
    },
    /// Fiber was high: vegetables were reduced
    Reduced {
        /// Reduction attempts that moved fiber%
        attempts: u32,
        /// Whether the loop stopped on a plateau
        plateaued: bool,
    },
}

fn fiber_percent(ledger: &AllocationLedger, config: &FormulationConfig) -> f64 {
    ledger.totals().fiber_percent(config.total_dm_g)
}

fn is_fiber_vegetable(entry: &Allocation, rule: &FiberTargetConfig) -> bool {
    let name = entry.name.to_lowercase();
    rule.vegetable_keywords.iter().any(|k| name.contains(k.as_str()))
}

/// Scale vegetable-keyword entries by `1 + percent/100`, then settle the ledger
fn scale_vegetables(ledger: &mut AllocationLedger, config: &FormulationConfig, percent: f64) -> usize {
    let was_balanced = balanced(ledger, config);
    let rule = &config.fiber;
    let touched = ledger.scale_where(|e| is_fiber_vegetable(e, rule), 1.0 + percent / 100.0);
    settle(ledger, config, was_balanced);
    touched
}

/// Bring fiber% back toward the configured band
pub fn adjust_fiber(
    ledger: &mut AllocationLedger,
    snapshot: &CatalogSnapshot,
    config: &FormulationConfig,
    budget: &mut DmBudget,
    found: &mut Vec<String>,
) -> FiberAdjustment {
    let rule = &config.fiber;
    let start = fiber_percent(ledger, config);

    if start < rule.min_percent {
        raise_fiber(ledger, snapshot, config, budget, found)
    } else if start > rule.reduction_trigger_percent {
        reduce_fiber(ledger, config, found)
    } else {
        if start > rule.max_percent {
            warn!(fiber_percent = start, "fiber above maximum but below reduction trigger");
            found.push(issues::fiber_above_maximum(start));
        }
        FiberAdjustment::Unchanged
    }
}

fn raise_fiber(
    ledger: &mut AllocationLedger,
    snapshot: &CatalogSnapshot,
    config: &FormulationConfig,
    budget: &mut DmBudget,
    found: &mut Vec<String>,
) -> FiberAdjustment {
    let rule = &config.fiber;
    let target = config.total_dm_g;

    let touched = scale_vegetables(ledger, config, rule.vegetable_step_percent);
    let mut current = fiber_percent(ledger, config);
    debug!(touched, fiber_percent = current, "vegetables increased for fiber");

    let mut boosters = Vec::new();
    if current < rule.min_percent {
        for booster in &snapshot.fiber_boosters {
            if current >= rule.booster_target_percent || budget.is_exhausted() {
                break;
            }
            if booster.profile.fiber_g <= 0.0 || ledger.contains(&booster.name) {
                continue;
            }

            let was_balanced = balanced(ledger, config);
            let band_cap = ((rule.booster_target_percent - current) * target / 100.0).min(rule.booster_cap_g);
            let mut dm = budget.remaining_g().min(band_cap);
            if !was_balanced {
                dm = dm.min(target - ledger.total_dm());
            }
            if dm <= 0.0 {
                break;
            }

            ledger.assign(booster, dm, origin_in(snapshot, booster));
            budget.spend(dm);
            settle(ledger, config, was_balanced);
            current = fiber_percent(ledger, config);
            debug!(booster = %booster.name, dm, fiber_percent = current, "fiber booster added");
            boosters.push(booster.name.clone());
        }
    }

    if current < rule.min_percent {
        warn!(fiber_percent = current, "fiber below minimum after adjustment");
        found.push(issues::fiber_remains_low(current));
    }
    FiberAdjustment::Increased { boosters }
}

fn reduce_fiber(ledger: &mut AllocationLedger, config: &FormulationConfig, found: &mut Vec<String>) -> FiberAdjustment {
    let rule = &config.fiber;
    let mut current = fiber_percent(ledger, config);
    let mut previous = current;
    let mut attempts = 0;
    let mut plateaued = false;

    while current > rule.max_percent && attempts < rule.max_reduction_attempts {
        scale_vegetables(ledger, config, -rule.vegetable_step_percent);
        current = fiber_percent(ledger, config);
        debug!(attempt = attempts + 1, fiber_percent = current, "vegetables reduced for fiber");

        if (current - previous).abs() < rule.plateau_epsilon {
            found.push(issues::fiber_reduction_not_effective(attempts + 1, current));
            plateaued = true;
            break;
        }
        previous = current;
        attempts += 1;
    }

    if current > rule.max_percent {
        warn!(fiber_percent = current, attempts, "fiber above maximum after adjustment");
        found.push(issues::fiber_remains_high(current, attempts));
    }
    FiberAdjustment::Reduced { attempts, plateaued }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryOrigin;
    use kibble_core::models::{CandidateIngredient, FixedIngredient, FoodGroup, NutrientProfile};

    fn with_fiber(name: &str, group: FoodGroup, fiber: f64) -> CandidateIngredient {
        let mut profile = NutrientProfile::default();
        profile.fiber_g = fiber;
        CandidateIngredient::new(name, group, profile)
    }

    fn fixed_base() -> AllocationLedger {
        AllocationLedger::seed(&[FixedIngredient::new("Premix", 100.0, NutrientProfile::default())])
    }

    #[test]
    fn test_high_fiber_reduced_within_attempt_cap() {
        let config = FormulationConfig::default();
        let mut ledger = fixed_base();
        ledger.assign(&with_fiber("Carrot", FoodGroup::VegetableA, 40.0), 150.0, EntryOrigin::Selected);
        ledger.assign(&with_fiber("Rice", FoodGroup::GrainA, 2.0), 750.0, EntryOrigin::Selected);
        let mut found = Vec::new();

        let before = fiber_percent(&ledger, &config);
        assert!(before > 7.0);
        let outcome = adjust_fiber(&mut ledger, &CatalogSnapshot::default(), &config, &mut DmBudget::new(0.0), &mut found);

        let FiberAdjustment::Reduced { attempts, .. } = outcome else {
            unreachable!("high fiber always takes the reduction branch");
        };
        assert!(attempts <= config.fiber.max_reduction_attempts);
        assert!(fiber_percent(&ledger, &config) < before);
        assert!((ledger.total_dm() - 1000.0).abs() < 0.01);
        assert!((ledger.fixed_dm() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reduction_plateau_stops_early_with_issue() {
        let config = FormulationConfig::default();
        let mut ledger = fixed_base();
        ledger.assign(&with_fiber("Beet Pulp", FoodGroup::VegetableC, 9.0), 900.0, EntryOrigin::Selected);
        let mut found = Vec::new();

        let outcome = adjust_fiber(&mut ledger, &CatalogSnapshot::default(), &config, &mut DmBudget::new(0.0), &mut found);

        assert_eq!(
            outcome,
            FiberAdjustment::Reduced {
                attempts: 0,
                plateaued: true
            }
        );
        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("Fiber reduction not effective after attempt 1."));
        assert!(found[1].starts_with("Fiber remains high (8.10%) after 0 attempts"));
    }

    #[test]
    fn test_low_fiber_adds_boosters_in_order() {
        let config = FormulationConfig::default();
        let mut ledger = fixed_base();
        ledger.assign(&with_fiber("Rice", FoodGroup::GrainA, 1.0), 900.0, EntryOrigin::Selected);
        let snapshot = CatalogSnapshot {
            fiber_boosters: vec![
                with_fiber("Psyllium Husk", FoodGroup::Unclassified, 80.0),
                with_fiber("Rice Bran", FoodGroup::Unclassified, 20.0),
            ],
            ..CatalogSnapshot::default()
        };
        let mut budget = DmBudget::new(900.0);
        let mut found = Vec::new();

        let outcome = adjust_fiber(&mut ledger, &snapshot, &config, &mut budget, &mut found);

        let FiberAdjustment::Increased { boosters } = outcome else {
            unreachable!("low fiber always takes the increase branch");
        };
        assert_eq!(boosters.first().map(String::as_str), Some("Psyllium Husk"));
        assert!(ledger.get("Psyllium Husk").map_or(0.0, |e| e.dm_g) <= config.fiber.booster_cap_g);
        assert!(ledger.auto_added().contains(&"Psyllium Husk".to_owned()));
        assert!(fiber_percent(&ledger, &config) >= config.fiber.min_percent);
        assert!((ledger.total_dm() - 1000.0).abs() < 0.01);
        assert!(found.is_empty());
    }

    #[test]
    fn test_in_band_fiber_unchanged() {
        let config = FormulationConfig::default();
        let mut ledger = fixed_base();
        ledger.assign(&with_fiber("Rice", FoodGroup::GrainA, 5.0), 900.0, EntryOrigin::Selected);

        let outcome = adjust_fiber(&mut ledger, &CatalogSnapshot::default(), &config, &mut DmBudget::new(0.0), &mut Vec::new());

        assert_eq!(outcome, FiberAdjustment::Unchanged);
    }

    #[test]
    fn test_fiber_between_max_and_trigger_is_reported() {
        let config = FormulationConfig::default();
        let mut ledger = fixed_base();
        ledger.assign(&with_fiber("Oats", FoodGroup::GrainA, 7.3), 900.0, EntryOrigin::Selected);
        let mut found = Vec::new();

        let outcome = adjust_fiber(&mut ledger, &CatalogSnapshot::default(), &config, &mut DmBudget::new(0.0), &mut found);

        assert_eq!(outcome, FiberAdjustment::Unchanged);
        assert_eq!(found, vec!["Fiber above maximum (6.57%) but below the reduction trigger.".to_owned()]);
        assert!((ledger.get("Oats").map_or(0.0, |e| e.dm_g) - 900.0).abs() < f64::EPSILON);
    }
}
