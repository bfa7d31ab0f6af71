// ABOUTME: Integration tests for the formulation engine pipeline
// ABOUTME: Exercises quota allocation, normalization and the protein and fiber passes end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{ingredient, init_test_logging, mineral_premix};
use kibble_core::constants::issues;
use kibble_core::models::FoodGroup;
use kibble_formulation::{
    distribute_exact, formulate, AllocationLedger, CatalogSnapshot, EntryOrigin, FiberAdjustment,
    FormulationConfig, GroupAllocator, ProteinAdjustment,
};
use std::collections::HashSet;

fn allocate(snapshot: &CatalogSnapshot) -> (AllocationLedger, Vec<String>) {
    let config = FormulationConfig::default();
    let mut ledger = AllocationLedger::seed(&snapshot.fixed);
    let mut found = Vec::new();
    GroupAllocator::new(snapshot, &config).allocate(&mut ledger, &mut found);
    (ledger, found)
}

fn dm_of(ledger: &AllocationLedger, name: &str) -> f64 {
    ledger.get(name).map_or(0.0, |e| e.dm_g)
}

/// Liver, carrot, rice and a fatty beef cut: protein lands around 31%
fn low_protein_snapshot() -> CatalogSnapshot {
    let beef = ingredient("Beef Chuck", FoodGroup::MeatB, 52.0, 44.0, 0.0);
    let turkey = ingredient("Turkey Breast", FoodGroup::MeatA, 86.0, 6.0, 0.0);
    CatalogSnapshot {
        selected: vec![
            ingredient("Chicken Liver", FoodGroup::Organ, 62.0, 18.0, 0.0),
            ingredient("Carrot", FoodGroup::VegetableA, 8.0, 2.0, 24.0),
            ingredient("Brown Rice", FoodGroup::GrainA, 8.5, 3.0, 3.8),
            beef.clone(),
            turkey.clone(),
        ],
        meat_catalog: vec![turkey, beef],
        ..CatalogSnapshot::default()
    }
}

#[test]
fn test_liver_and_heart_split_two_to_one() {
    init_test_logging();
    let snapshot = CatalogSnapshot {
        selected: vec![
            ingredient("Chicken Liver", FoodGroup::Organ, 62.0, 18.0, 0.0),
            ingredient("Chicken Heart", FoodGroup::Organ, 60.0, 33.0, 0.0),
        ],
        ..CatalogSnapshot::default()
    };

    let (ledger, found) = allocate(&snapshot);
    assert!((dm_of(&ledger, "Chicken Liver") - 100.0).abs() < 1e-9);
    assert!((dm_of(&ledger, "Chicken Heart") - 50.0).abs() < 1e-9);
    assert!(!found.iter().any(|i| i == issues::LIVER_REQUIRED));

    let result = formulate(&snapshot, &FormulationConfig::default());
    let ratio = dm_of(&result.ledger, "Chicken Liver") / dm_of(&result.ledger, "Chicken Heart");
    assert!((ratio - 2.0).abs() < 1e-9);
    assert!(!result.issues.iter().any(|i| i == issues::LIVER_REQUIRED));
}

#[test]
fn test_no_meat_selected_is_reported() {
    init_test_logging();
    let snapshot = CatalogSnapshot {
        fixed: vec![mineral_premix(30.0)],
        selected: vec![
            ingredient("Chicken Liver", FoodGroup::Organ, 62.0, 18.0, 0.0),
            ingredient("Carrot", FoodGroup::VegetableA, 8.0, 2.0, 24.0),
        ],
        ..CatalogSnapshot::default()
    };

    let result = formulate(&snapshot, &FormulationConfig::default());

    assert!(result.issues.contains(&issues::NO_MEAT_SELECTED.to_owned()));
    assert!(result.ledger.dm_in_groups(&FoodGroup::MEATS).abs() < f64::EPSILON);
    assert_eq!(result.report().dm_breakdown.len(), 3);
}

#[test]
fn test_two_vegetable_a_split_evenly() {
    let snapshot = CatalogSnapshot {
        selected: vec![
            ingredient("Carrot", FoodGroup::VegetableA, 8.0, 2.0, 24.0),
            ingredient("Spinach", FoodGroup::VegetableA, 36.0, 5.0, 28.0),
        ],
        ..CatalogSnapshot::default()
    };

    let (ledger, _) = allocate(&snapshot);

    assert!((dm_of(&ledger, "Carrot") - 40.0).abs() < 1e-9);
    assert!((dm_of(&ledger, "Spinach") - 40.0).abs() < 1e-9);
    assert!((ledger.dm_in_groups(&[FoodGroup::VegetableA]) - 80.0).abs() < 1e-9);
}

#[test]
fn test_distribute_exact_sums_to_target() {
    let pool = [
        ingredient("Oats", FoodGroup::GrainA, 15.0, 7.5, 10.0),
        ingredient("Barley", FoodGroup::GrainA, 12.0, 2.0, 15.0),
        ingredient("Millet", FoodGroup::GrainA, 11.0, 4.0, 8.0),
    ];
    let refs: Vec<_> = pool.iter().collect();
    let mut ledger = AllocationLedger::default();

    let assigned = distribute_exact(&mut ledger, &refs, 100.0, |_| EntryOrigin::Selected);

    assert!((assigned - 100.0).abs() < 1e-9);
    assert!((ledger.total_dm() - 100.0).abs() < 1e-9);
    assert!((dm_of(&ledger, "Oats") - 33.33).abs() < 1e-9);
    assert!((dm_of(&ledger, "Millet") - 33.34).abs() < 1e-9);

    let mut empty = AllocationLedger::default();
    assert!(distribute_exact(&mut empty, &[], 100.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
    assert!(distribute_exact(&mut empty, &refs, 0.0, |_| EntryOrigin::Selected).abs() < f64::EPSILON);
    assert!(empty.is_empty());
}

#[test]
fn test_total_dm_and_fixed_base_invariants() {
    init_test_logging();
    let mut snapshot = low_protein_snapshot();
    snapshot.fixed = vec![mineral_premix(30.0)];

    let result = formulate(&snapshot, &FormulationConfig::default());

    assert!((result.ledger.total_dm() - 1000.0).abs() < 0.01);
    assert!((dm_of(&result.ledger, "Mineral Premix") - 30.0).abs() < f64::EPSILON);
    let names: HashSet<&str> = result.ledger.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names.len(), result.ledger.len());
}

#[test]
fn test_low_protein_supplemented_from_highest_protein_meat() {
    init_test_logging();
    let snapshot = low_protein_snapshot();

    let mut no_feedback = FormulationConfig::default();
    no_feedback.protein.min_percent = 0.0;
    let baseline = formulate(&snapshot, &no_feedback).totals().protein_percent(1000.0);
    assert!(baseline < 32.0);

    let result = formulate(&snapshot, &FormulationConfig::default());
    let ProteinAdjustment::Supplemented { added } = &result.protein else {
        unreachable!("protein below minimum with an unused meat must be supplemented");
    };
    assert_eq!(added[0].0, "Turkey Breast");

    let protein = result.totals().protein_percent(1000.0);
    assert!(protein >= baseline);
    assert!(protein >= 32.0 - 1e-6);
    assert!((result.ledger.total_dm() - 1000.0).abs() < 0.01);
}

#[test]
fn test_high_fiber_reduction_is_bounded() {
    init_test_logging();
    let snapshot = CatalogSnapshot {
        selected: vec![
            ingredient("Chicken Liver", FoodGroup::Organ, 62.0, 18.0, 0.0),
            ingredient("Carrot", FoodGroup::VegetableA, 8.0, 2.0, 60.0),
            ingredient("Spinach", FoodGroup::VegetableA, 36.0, 5.0, 60.0),
            ingredient("Broccoli", FoodGroup::VegetableB, 26.0, 4.0, 60.0),
            ingredient("Chicken Breast", FoodGroup::MeatA, 85.0, 8.0, 0.0),
        ],
        ..CatalogSnapshot::default()
    };
    let config = FormulationConfig::default();

    let result = formulate(&snapshot, &config);

    let FiberAdjustment::Reduced { attempts, plateaued } = result.fiber else {
        unreachable!("fiber far above the trigger must take the reduction branch");
    };
    assert_eq!(attempts, config.fiber.max_reduction_attempts);
    assert!(!plateaued);
    assert!(result.totals().fiber_percent(1000.0) > config.fiber.max_percent);
    assert!(result
        .issues
        .iter()
        .any(|i| i.starts_with("Fiber remains high") && i.contains("after 5 attempts")));
    assert!((result.ledger.total_dm() - 1000.0).abs() < 0.01);
}

#[test]
fn test_report_is_rounded_and_serializable() {
    let mut snapshot = low_protein_snapshot();
    snapshot.fixed = vec![mineral_premix(30.0)];
    snapshot.unresolved = vec!["Kangaroo".to_owned()];

    let report = formulate(&snapshot, &FormulationConfig::default()).report();

    assert!((report.nutrient_percentages.total_dm_g - 1000.0).abs() < 0.01);
    assert!(report.nutrient_percentages.ca_p_ratio > 0.0);
    assert_eq!(report.dm_breakdown.len(), report.ingredient_totals.len());
    assert!(report.dm_breakdown[0].fixed);
    assert_eq!(report.unresolved, vec!["Kangaroo".to_owned()]);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["nutrient_percentages"]["protein"].is_number());
    assert!(json["ingredient_totals"][0]["protein_g"].is_number());
}
