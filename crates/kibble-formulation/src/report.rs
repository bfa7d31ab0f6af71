// ABOUTME: Formulation report: nutrient percentages, DM breakdown, per-ingredient totals, issues
// ABOUTME: Values are rounded to 2 decimals here only; the ledger keeps full precision
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::allocator::round2;
use crate::ledger::AllocationLedger;
use crate::totals::{percent_of, AggregateTotals, IngredientTotals};
use serde::{Deserialize, Serialize};

/// Aggregate nutrients as a percentage of the DM target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientPercentages {
    /// Protein %
    pub protein: f64,
    /// Fat %
    pub fat: f64,
    /// Carbohydrate %
    pub cho: f64,
    /// Fiber %
    pub fiber: f64,
    /// Ash %
    pub ash: f64,
    /// Calcium %
    pub calcium: f64,
    /// Phosphorus %
    pub phosphorus: f64,
    /// Calcium to phosphorus ratio, 0 without phosphorus
    pub ca_p_ratio: f64,
    /// Total energy (kcal)
    pub energy_kcal: f64,
    /// DM target the percentages are relative to (g)
    pub total_dm_g: f64,
}

impl NutrientPercentages {
    /// Percentages of `aggregate` over `total_dm_g`, rounded for presentation
    #[must_use]
    pub fn from_totals(aggregate: &AggregateTotals, total_dm_g: f64) -> Self {
        let pct = |v: f64| round2(percent_of(v, total_dm_g));
        Self {
            protein: pct(aggregate.protein_g),
            fat: pct(aggregate.fat_g),
            cho: pct(aggregate.cho_g),
            fiber: pct(aggregate.fiber_g),
            ash: pct(aggregate.ash_g),
            calcium: pct(aggregate.calcium_g),
            phosphorus: pct(aggregate.phosphorus_g),
            ca_p_ratio: round2(aggregate.ca_p_ratio()),
            energy_kcal: round2(aggregate.energy_kcal),
            total_dm_g: round2(total_dm_g),
        }
    }
}

/// One row of the DM breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmBreakdownEntry {
    /// Ingredient name
    pub ingredient: String,
    /// Assigned DM (g)
    pub dm_g: f64,
    /// Whether the entry belongs to the fixed base
    pub fixed: bool,
}

/// One row of the per-ingredient nutrient table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientTotalsRow {
    /// Ingredient name
    pub ingredient: String,
    /// Assigned DM (g)
    pub dm_g: f64,
    /// Whether the entry belongs to the fixed base
    pub fixed: bool,
    /// Absolute nutrient amounts at `dm_g`
    #[serde(flatten)]
    pub totals: IngredientTotals,
}

/// Structured result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationReport {
    /// Aggregate percentages
    pub nutrient_percentages: NutrientPercentages,
    /// DM per ingredient in ledger order
    pub dm_breakdown: Vec<DmBreakdownEntry>,
    /// Nutrient amounts per ingredient in ledger order
    pub ingredient_totals: Vec<IngredientTotalsRow>,
    /// Human-readable issues, in the order they were found
    pub issues: Vec<String>,
    /// Ingredients the engine added that the request did not name
    pub auto_added: Vec<String>,
    /// Requested names missing from the catalog
    pub unresolved: Vec<String>,
}

impl FormulationReport {
    /// Build a report from the final ledger
    #[must_use]
    pub fn build(
        ledger: &AllocationLedger,
        total_dm_g: f64,
        issues: Vec<String>,
        unresolved: Vec<String>,
    ) -> Self {
        let dm_breakdown = ledger
            .entries()
            .iter()
            .map(|e| DmBreakdownEntry {
                ingredient: e.name.clone(),
                dm_g: round2(e.dm_g),
                fixed: e.fixed,
            })
            .collect();

        let ingredient_totals = ledger
            .entries()
            .iter()
            .map(|e| IngredientTotalsRow {
                ingredient: e.name.clone(),
                dm_g: round2(e.dm_g),
                fixed: e.fixed,
                totals: rounded(&e.totals()),
            })
            .collect();

        Self {
            nutrient_percentages: NutrientPercentages::from_totals(&ledger.totals(), total_dm_g),
            dm_breakdown,
            ingredient_totals,
            issues,
            auto_added: ledger.auto_added(),
            unresolved,
        }
    }
}

fn rounded(t: &IngredientTotals) -> IngredientTotals {
    IngredientTotals {
        protein_g: round2(t.protein_g),
        fat_g: round2(t.fat_g),
        cho_g: round2(t.cho_g),
        fiber_g: round2(t.fiber_g),
        ash_g: round2(t.ash_g),
        ca_mg: round2(t.ca_mg),
        p_mg: round2(t.p_mg),
        iron_mg: round2(t.iron_mg),
        energy_kcal: round2(t.energy_kcal),
    }
}
