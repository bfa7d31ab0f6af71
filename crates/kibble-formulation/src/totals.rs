// ABOUTME: Totals aggregator deriving per-ingredient and aggregate nutrient amounts from DM
// ABOUTME: Every figure is a pure function of (dm_g, profile) and is recomputed on demand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use kibble_core::models::NutrientProfile;
use serde::{Deserialize, Serialize};

/// Absolute nutrient amounts contributed by one ingredient at a given DM
///
/// Calcium, phosphorus and iron stay in milligrams here; the aggregate applies
/// the unit conversions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientTotals {
    /// Protein (g)
    pub protein_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Carbohydrate (g)
    pub cho_g: f64,
    /// Fiber (g)
    pub fiber_g: f64,
    /// Ash (g)
    pub ash_g: f64,
    /// Calcium (mg)
    pub ca_mg: f64,
    /// Phosphorus (mg)
    pub p_mg: f64,
    /// Iron (mg)
    pub iron_mg: f64,
    /// Energy (kcal)
    pub energy_kcal: f64,
}

impl IngredientTotals {
    /// Amounts supplied by `dm_g` grams of an ingredient with `profile` per 100 g DM
    #[must_use]
    pub fn compute(profile: &NutrientProfile, dm_g: f64) -> Self {
        let per = |value: f64| value * dm_g / 100.0;
        Self {
            protein_g: per(profile.protein_g),
            fat_g: per(profile.fat_g),
            cho_g: per(profile.cho_g),
            fiber_g: per(profile.fiber_g),
            ash_g: per(profile.ash_g),
            ca_mg: per(profile.calcium_mg),
            p_mg: per(profile.phosphorus_mg),
            iron_mg: per(profile.iron_mg),
            energy_kcal: per(profile.energy_kcal),
        }
    }
}

/// Nutrient totals summed across every ingredient in the mix
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotals {
    /// Protein (g)
    pub protein_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Carbohydrate (g)
    pub cho_g: f64,
    /// Fiber (g)
    pub fiber_g: f64,
    /// Ash (g)
    pub ash_g: f64,
    /// Calcium (g, converted from mg by /1000)
    pub calcium_g: f64,
    /// Phosphorus (g, converted from mg by /1000)
    pub phosphorus_g: f64,
    /// Iron (catalog mg/100 g units, converted by /100)
    pub iron: f64,
    /// Energy (kcal)
    pub energy_kcal: f64,
}

impl AggregateTotals {
    /// Fold one ingredient's totals into the aggregate
    pub fn add(&mut self, item: &IngredientTotals) {
        self.protein_g += item.protein_g;
        self.fat_g += item.fat_g;
        self.cho_g += item.cho_g;
        self.fiber_g += item.fiber_g;
        self.ash_g += item.ash_g;
        self.calcium_g += item.ca_mg / 1000.0;
        self.phosphorus_g += item.p_mg / 1000.0;
        self.iron += item.iron_mg / 100.0;
        self.energy_kcal += item.energy_kcal;
    }

    /// Sum a sequence of ingredient totals
    #[must_use]
    pub fn sum<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a IngredientTotals>,
    {
        let mut aggregate = Self::default();
        for item in items {
            aggregate.add(item);
        }
        aggregate
    }

    /// Protein as a percentage of `total_dm_g`
    #[must_use]
    pub fn protein_percent(&self, total_dm_g: f64) -> f64 {
        percent_of(self.protein_g, total_dm_g)
    }

    /// Fiber as a percentage of `total_dm_g`
    #[must_use]
    pub fn fiber_percent(&self, total_dm_g: f64) -> f64 {
        percent_of(self.fiber_g, total_dm_g)
    }

    /// Calcium to phosphorus ratio, 0 when there is no phosphorus
    #[must_use]
    pub fn ca_p_ratio(&self) -> f64 {
        if self.phosphorus_g > 0.0 {
            self.calcium_g / self.phosphorus_g
        } else {
            0.0
        }
    }
}

/// `value` as a percentage of `total_dm_g`, 0 for a non-positive total
#[must_use]
pub fn percent_of(value: f64, total_dm_g: f64) -> f64 {
    if total_dm_g > 0.0 {
        value * 100.0 / total_dm_g
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> NutrientProfile {
        NutrientProfile::from_array([60.0, 20.0, 5.0, 2.0, 4.0, 300.0, 600.0, 12.0, 450.0])
    }

    #[test]
    fn test_ingredient_totals_scale_with_dm() {
        let totals = IngredientTotals::compute(&profile(), 50.0);
        assert!((totals.protein_g - 30.0).abs() < 1e-9);
        assert!((totals.ca_mg - 150.0).abs() < 1e-9);
        assert!((totals.energy_kcal - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_applies_unit_conversions() {
        let totals = IngredientTotals::compute(&profile(), 100.0);
        let aggregate = AggregateTotals::sum([&totals]);
        assert!((aggregate.calcium_g - 0.3).abs() < 1e-9);
        assert!((aggregate.phosphorus_g - 0.6).abs() < 1e-9);
        assert!((aggregate.iron - 0.12).abs() < 1e-9);
        assert!((aggregate.ca_p_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ca_p_ratio_zero_without_phosphorus() {
        let aggregate = AggregateTotals {
            calcium_g: 2.0,
            ..AggregateTotals::default()
        };
        assert!(aggregate.ca_p_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert!(percent_of(10.0, 0.0).abs() < f64::EPSILON);
        assert!((percent_of(320.0, 1000.0) - 32.0).abs() < 1e-9);
    }
}
