// ABOUTME: Formulation configuration: DM targets, group quotas, and nutrient bands
// ABOUTME: Defaults encode the standard 1000 g DM recipe; every threshold is overridable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Formulation Configuration
//!
//! Thresholds that govern the group allocator, the normalizer and the feedback
//! adjuster. These are configuration constants, not request inputs: a request
//! only names ingredients.

use crate::error::ConfigError;
use kibble_core::constants::keywords;
use serde::{Deserialize, Serialize};

/// Complete formulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulationConfig {
    /// Grand total dry matter of the finished mix (g)
    pub total_dm_g: f64,
    /// Smallest total-DM gap the normalizer will correct (g)
    pub rescale_threshold_g: f64,
    /// Organ meat quota
    pub organ: OrganRuleConfig,
    /// Vegetable tier quotas
    pub vegetables: VegetableRuleConfig,
    /// Fruit cap (g)
    pub fruit_limit_g: f64,
    /// Oil reservation (g)
    pub oil_reserved_g: f64,
    /// Grain tier quotas
    pub grains: GrainRuleConfig,
    /// Meat policy table thresholds and amounts
    pub meat: MeatRuleConfig,
    /// Protein band
    pub protein: ProteinTargetConfig,
    /// Fiber band and adjustment limits
    pub fiber: FiberTargetConfig,
}

/// Organ quota: a liver takes a fixed share, other organs fill the rest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganRuleConfig {
    /// Total organ DM target (g)
    pub target_g: f64,
    /// Share of the target reserved for the first liver, truncated to whole grams
    pub liver_share: f64,
}

impl OrganRuleConfig {
    /// DM assigned to the liver (150 g x 2/3 = 100 g with defaults)
    #[must_use]
    pub fn liver_dm_g(&self) -> f64 {
        (self.target_g * self.liver_share).trunc()
    }
}

/// Vegetable tiers A and B have minimums; C fills up to the combined target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetableRuleConfig {
    /// Tier A minimum (g)
    pub a_min_g: f64,
    /// Tier B minimum (g)
    pub b_min_g: f64,
    /// Combined A+B+C target (g)
    pub combined_target_g: f64,
}

/// Grain tier A has a minimum, tier B a maximum
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainRuleConfig {
    /// Overall grain target (g)
    pub target_g: f64,
    /// Tier A minimum (g)
    pub a_min_g: f64,
    /// Tier B maximum (g)
    pub b_max_g: f64,
}

/// Meat policy table parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeatRuleConfig {
    /// Minimum meat DM (g)
    pub min_g: f64,
    /// Maximum meat DM (g)
    pub max_g: f64,
    /// Meat-B average fat above which meat-B is treated as fatty
    pub fatty_b_fat_threshold: f64,
    /// DM taken from fatty meat-B (g)
    pub fatty_b_alloc_g: f64,
    /// DM taken from lean meat-A fallbacks after fatty meat-B (g)
    pub fatty_b_fallback_g: f64,
    /// Meat-A average fat below which meat-A alone is treated as lean
    pub lean_a_fat_threshold: f64,
    /// DM taken from lean meat-A before topping up (g)
    pub lean_a_alloc_g: f64,
    /// Meat-C average fat above which meat-C alone is treated as fatty
    pub fatty_c_fat_threshold: f64,
    /// DM taken from fatty meat-C (g)
    pub fatty_c_alloc_g: f64,
    /// DM taken from meat-A fallbacks after fatty meat-C (g)
    pub fatty_c_fallback_g: f64,
    /// Animal vocabulary for pairing fatty meats with fallbacks
    pub animal_keywords: Vec<String>,
}

/// Protein band as a percentage of total DM
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProteinTargetConfig {
    /// Minimum protein %
    pub min_percent: f64,
    /// Maximum protein %
    pub max_percent: f64,
}

/// Fiber band and the bounded adjustment loops that enforce it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberTargetConfig {
    /// Minimum fiber %
    pub min_percent: f64,
    /// Maximum fiber %
    pub max_percent: f64,
    /// Fiber % above which the reduction loop starts
    pub reduction_trigger_percent: f64,
    /// Fiber % the booster injection aims for
    pub booster_target_percent: f64,
    /// Largest DM added from a single booster (g)
    pub booster_cap_g: f64,
    /// Vegetable DM change per adjustment step (%)
    pub vegetable_step_percent: f64,
    /// Hard cap on reduction attempts
    pub max_reduction_attempts: u32,
    /// Fiber % change below which a reduction attempt counts as a plateau
    pub plateau_epsilon: f64,
    /// Name fragments of vegetables the fiber pass rescales
    pub vegetable_keywords: Vec<String>,
    /// Catalog names (case-insensitive) of fiber boosters, in priority order
    pub booster_names: Vec<String>,
}

impl Default for FormulationConfig {
    fn default() -> Self {
        Self {
            total_dm_g: 1000.0,
            rescale_threshold_g: 0.1,
            organ: OrganRuleConfig::default(),
            vegetables: VegetableRuleConfig::default(),
            fruit_limit_g: 20.0,
            oil_reserved_g: 10.0,
            grains: GrainRuleConfig::default(),
            meat: MeatRuleConfig::default(),
            protein: ProteinTargetConfig::default(),
            fiber: FiberTargetConfig::default(),
        }
    }
}

impl Default for OrganRuleConfig {
    fn default() -> Self {
        Self {
            target_g: 150.0,
            liver_share: 2.0 / 3.0,
        }
    }
}

impl Default for VegetableRuleConfig {
    fn default() -> Self {
        Self {
            a_min_g: 80.0,
            b_min_g: 50.0,
            combined_target_g: 150.0,
        }
    }
}

impl Default for GrainRuleConfig {
    fn default() -> Self {
        Self {
            target_g: 350.0,
            a_min_g: 150.0,
            b_max_g: 200.0,
        }
    }
}

impl Default for MeatRuleConfig {
    fn default() -> Self {
        Self {
            min_g: 200.0,
            max_g: 250.0,
            fatty_b_fat_threshold: 30.0,
            fatty_b_alloc_g: 100.0,
            fatty_b_fallback_g: 150.0,
            lean_a_fat_threshold: 12.0,
            lean_a_alloc_g: 150.0,
            fatty_c_fat_threshold: 16.0,
            fatty_c_alloc_g: 200.0,
            fatty_c_fallback_g: 100.0,
            animal_keywords: keywords::ANIMALS.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

impl Default for ProteinTargetConfig {
    fn default() -> Self {
        Self {
            min_percent: 32.0,
            max_percent: 42.0,
        }
    }
}

impl Default for FiberTargetConfig {
    fn default() -> Self {
        Self {
            min_percent: 3.0,
            max_percent: 6.0,
            reduction_trigger_percent: 7.0,
            booster_target_percent: 4.5,
            booster_cap_g: 30.0,
            vegetable_step_percent: 10.0,
            max_reduction_attempts: 5,
            plateau_epsilon: 0.01,
            vegetable_keywords: keywords::FIBER_VEGETABLES
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            booster_names: keywords::FIBER_BOOSTERS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
        }
    }
}

impl FormulationConfig {
    /// Validate ranges and cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an amount is negative or not finite, the total
    /// DM is not positive, a minimum exceeds its maximum, the liver share lies
    /// outside (0, 1], or the reduction attempt cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let amounts = [
            ("total_dm_g", self.total_dm_g),
            ("rescale_threshold_g", self.rescale_threshold_g),
            ("organ.target_g", self.organ.target_g),
            ("vegetables.a_min_g", self.vegetables.a_min_g),
            ("vegetables.b_min_g", self.vegetables.b_min_g),
            ("vegetables.combined_target_g", self.vegetables.combined_target_g),
            ("fruit_limit_g", self.fruit_limit_g),
            ("oil_reserved_g", self.oil_reserved_g),
            ("grains.target_g", self.grains.target_g),
            ("grains.a_min_g", self.grains.a_min_g),
            ("grains.b_max_g", self.grains.b_max_g),
            ("meat.min_g", self.meat.min_g),
            ("meat.max_g", self.meat.max_g),
            ("meat.fatty_b_alloc_g", self.meat.fatty_b_alloc_g),
            ("meat.fatty_b_fallback_g", self.meat.fatty_b_fallback_g),
            ("meat.lean_a_alloc_g", self.meat.lean_a_alloc_g),
            ("meat.fatty_c_alloc_g", self.meat.fatty_c_alloc_g),
            ("meat.fatty_c_fallback_g", self.meat.fatty_c_fallback_g),
            ("protein.min_percent", self.protein.min_percent),
            ("protein.max_percent", self.protein.max_percent),
            ("fiber.min_percent", self.fiber.min_percent),
            ("fiber.max_percent", self.fiber.max_percent),
            ("fiber.reduction_trigger_percent", self.fiber.reduction_trigger_percent),
            ("fiber.booster_target_percent", self.fiber.booster_target_percent),
            ("fiber.booster_cap_g", self.fiber.booster_cap_g),
            ("fiber.plateau_epsilon", self.fiber.plateau_epsilon),
        ];

        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange { field, value });
            }
        }

        if self.total_dm_g <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                field: "total_dm_g",
                value: self.total_dm_g,
            });
        }

        if !(self.organ.liver_share > 0.0 && self.organ.liver_share <= 1.0) {
            return Err(ConfigError::ValueOutOfRange {
                field: "organ.liver_share",
                value: self.organ.liver_share,
            });
        }

        let step = self.fiber.vegetable_step_percent;
        if !step.is_finite() || step <= 0.0 || step >= 100.0 {
            return Err(ConfigError::ValueOutOfRange {
                field: "fiber.vegetable_step_percent",
                value: step,
            });
        }

        if self.meat.min_g > self.meat.max_g {
            return Err(ConfigError::InvalidRange("meat.min_g exceeds meat.max_g"));
        }
        if self.protein.min_percent > self.protein.max_percent {
            return Err(ConfigError::InvalidRange(
                "protein.min_percent exceeds protein.max_percent",
            ));
        }
        if self.fiber.min_percent > self.fiber.max_percent {
            return Err(ConfigError::InvalidRange(
                "fiber.min_percent exceeds fiber.max_percent",
            ));
        }
        if self.fiber.reduction_trigger_percent < self.fiber.max_percent {
            return Err(ConfigError::InvalidRange(
                "fiber.reduction_trigger_percent is below fiber.max_percent",
            ));
        }
        if self.fiber.max_reduction_attempts == 0 {
            return Err(ConfigError::InvalidAttemptCap("fiber.max_reduction_attempts"));
        }

        Ok(())
    }
}
